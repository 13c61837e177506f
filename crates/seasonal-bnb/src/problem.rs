// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Constraint Model
//!
//! The per-tier search problem derived from an `AllocationModel`.
//!
//! ## Variables
//!
//! One optional **selection variable** exists per `(space, event, occurrence)`
//! triple that could possibly be granted: the space is eligible for the
//! event, admits its headcount, has enough budget on every date of the
//! occurrence, and offers at least one start time that is open on all of
//! those dates and inside the requested window. Triples failing any of
//! these checks never become variables.
//!
//! Each variable carries its **start domain**, a normalized list of feasible
//! start ticks of day. The interval it occupies is
//! `[start, start + min_duration)`.
//!
//! ## Constraints
//!
//! 1. At most one selected variable per occurrence (`OccurrenceNode`).
//! 2. No overlap per space: variables are grouped by `(space, weekday)`;
//!    inside a group two intervals conflict only if their occurrences share
//!    a date (`NoOverlapGroup`).
//! 3. Weekly quota: at most `events_per_week` selected variables per event
//!    (`EventQuota`).
//! 4. Daily capacity: the granted ticks of a space on a date stay within
//!    that date's budget.
//!
//! The objective is to maximize the total granted duration.

use chrono::Weekday;
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashMap;
use seasonal_core::{
    math::{interval::ClosedOpenInterval, set},
    utils::index::{TypedIndex, TypedIndexTag},
};
use seasonal_model::{
    index::{EventIndex, OccurrenceIndex, SpaceIndex},
    model::AllocationModel,
    time::Tick,
};
use std::ops::Range;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VarIndexTag;

impl TypedIndexTag for VarIndexTag {
    const NAME: &'static str = "VarIndex";
}

/// A typed index of a selection variable.
pub type VarIndex = TypedIndex<VarIndexTag>;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeIndexTag;

impl TypedIndexTag for NodeIndexTag {
    const NAME: &'static str = "NodeIndex";
}

/// A typed index of an occurrence node, one search level.
pub type NodeIndex = TypedIndex<NodeIndexTag>;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct QuotaIndexTag;

impl TypedIndexTag for QuotaIndexTag {
    const NAME: &'static str = "QuotaIndex";
}

/// A typed index of an event quota.
pub type QuotaIndex = TypedIndex<QuotaIndexTag>;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GroupIndexTag;

impl TypedIndexTag for GroupIndexTag {
    const NAME: &'static str = "GroupIndex";
}

/// A typed index of a no-overlap group.
pub type GroupIndex = TypedIndex<GroupIndexTag>;

/// An optional placement of one occurrence in one space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionVar {
    space: SpaceIndex,
    event: EventIndex,
    occurrence: OccurrenceIndex,
    node: NodeIndex,
    group: GroupIndex,
    length: Tick,
    start_domain: Vec<ClosedOpenInterval<Tick>>,
}

impl SelectionVar {
    #[inline]
    pub fn space(&self) -> SpaceIndex {
        self.space
    }

    #[inline]
    pub fn event(&self) -> EventIndex {
        self.event
    }

    #[inline]
    pub fn occurrence(&self) -> OccurrenceIndex {
        self.occurrence
    }

    #[inline]
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    #[inline]
    pub fn group(&self) -> GroupIndex {
        self.group
    }

    /// The number of ticks the placement occupies, which is also its objective weight.
    #[inline]
    pub fn length(&self) -> Tick {
        self.length
    }

    /// Feasible start ticks of day, normalized and non-empty.
    #[inline]
    pub fn start_domain(&self) -> &[ClosedOpenInterval<Tick>] {
        &self.start_domain
    }

    /// Number of distinct feasible start ticks.
    #[inline]
    pub fn domain_size(&self) -> Tick {
        set::total_len(&self.start_domain)
    }
}

/// An occurrence taking part in the search, with its candidate variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccurrenceNode {
    occurrence: OccurrenceIndex,
    quota: QuotaIndex,
    weekday: Weekday,
    length: Tick,
    days: FixedBitSet,
    day_list: Vec<u32>,
    vars: Range<usize>,
}

impl OccurrenceNode {
    #[inline]
    pub fn occurrence(&self) -> OccurrenceIndex {
        self.occurrence
    }

    #[inline]
    pub fn quota(&self) -> QuotaIndex {
        self.quota
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    #[inline]
    pub fn length(&self) -> Tick {
        self.length
    }

    /// Period days the occurrence recurs on, as a bit set.
    #[inline]
    pub fn days(&self) -> &FixedBitSet {
        &self.days
    }

    /// Period days the occurrence recurs on, sorted.
    #[inline]
    pub fn day_list(&self) -> &[u32] {
        &self.day_list
    }

    /// The candidate variables of this node.
    #[inline]
    pub fn vars(&self) -> impl ExactSizeIterator<Item = VarIndex> + Clone + use<> {
        self.vars.clone().map(VarIndex::new)
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }
}

/// The weekly quota of one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventQuota {
    event: EventIndex,
    limit: u32,
    length: Tick,
    nodes: Vec<NodeIndex>,
}

impl EventQuota {
    #[inline]
    pub fn event(&self) -> EventIndex {
        self.event
    }

    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Granted ticks per selected occurrence.
    #[inline]
    pub fn length(&self) -> Tick {
        self.length
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }
}

/// All variables that may collide in one space on one weekday.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoOverlapGroup {
    space: SpaceIndex,
    weekday: Weekday,
    vars: Vec<VarIndex>,
}

impl NoOverlapGroup {
    #[inline]
    pub fn space(&self) -> SpaceIndex {
        self.space
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    #[inline]
    pub fn vars(&self) -> &[VarIndex] {
        &self.vars
    }
}

/// The search problem of one tier.
#[derive(Clone, Debug)]
pub struct ConstraintModel {
    vars: Vec<SelectionVar>,
    nodes: Vec<OccurrenceNode>,
    quotas: Vec<EventQuota>,
    groups: Vec<NoOverlapGroup>,
    capacities: Vec<Vec<Tick>>,
    num_days: u32,
}

/// Feasible starts of a `length` tick block inside `window` on every day of `days` in `space`.
fn start_domain(
    model: &AllocationModel,
    space: SpaceIndex,
    window: ClosedOpenInterval<Tick>,
    length: Tick,
    days: &[u32],
) -> Vec<ClosedOpenInterval<Tick>> {
    let ticks_per_day = model.ticks_per_day();
    let space = model.space(space);
    let mut domain: Vec<ClosedOpenInterval<Tick>> = window.starts_fitting(length).into_iter().collect();
    for &day in days {
        if domain.is_empty() {
            break;
        }
        let starts: Vec<ClosedOpenInterval<Tick>> = space
            .open_windows_on(day, ticks_per_day)
            .iter()
            .filter_map(|open| open.starts_fitting(length))
            .collect();
        domain = set::intersect(&domain, &starts);
    }
    domain
}

impl ConstraintModel {
    /// Builds the search problem for `events` against the current capacity of `model`.
    ///
    /// Events are taken in the given order; duplicates are ignored.
    pub fn build(model: &AllocationModel, events: &[EventIndex]) -> Self {
        let num_days = model.period().num_days();
        let mut vars: Vec<SelectionVar> = Vec::new();
        let mut nodes: Vec<OccurrenceNode> = Vec::new();
        let mut quotas: Vec<EventQuota> = Vec::with_capacity(events.len());
        let mut groups: Vec<NoOverlapGroup> = Vec::new();
        let mut group_lookup: FxHashMap<(SpaceIndex, Weekday), GroupIndex> = FxHashMap::default();
        let mut seen = FixedBitSet::with_capacity(model.num_events());
        let mut pruned = 0usize;

        for &event_index in events {
            if seen.put(event_index.get()) {
                continue;
            }
            let event = model.event(event_index);
            let length = event.min_duration();
            let quota_index = QuotaIndex::new(quotas.len());
            let mut quota = EventQuota {
                event: event_index,
                limit: event.events_per_week(),
                length,
                nodes: Vec::new(),
            };

            for &occurrence_index in event.occurrences() {
                let occurrence = model.occurrence(occurrence_index);
                if occurrence.days().is_empty() || quota.limit == 0 {
                    continue;
                }
                let node_index = NodeIndex::new(nodes.len());
                let first_var = vars.len();

                for &space_index in event.eligible_spaces() {
                    let space = model.space(space_index);
                    let has_budget = occurrence
                        .days()
                        .iter()
                        .all(|&day| space.capacity_on(day) >= length);
                    if !space.admits(event.num_persons()) || !has_budget {
                        pruned += 1;
                        continue;
                    }
                    let domain = start_domain(
                        model,
                        space_index,
                        occurrence.window(),
                        length,
                        occurrence.days(),
                    );
                    if domain.is_empty() {
                        pruned += 1;
                        continue;
                    }

                    let group = *group_lookup
                        .entry((space_index, occurrence.weekday()))
                        .or_insert_with(|| {
                            groups.push(NoOverlapGroup {
                                space: space_index,
                                weekday: occurrence.weekday(),
                                vars: Vec::new(),
                            });
                            GroupIndex::new(groups.len() - 1)
                        });
                    let var_index = VarIndex::new(vars.len());
                    groups[group.get()].vars.push(var_index);
                    vars.push(SelectionVar {
                        space: space_index,
                        event: event_index,
                        occurrence: occurrence_index,
                        node: node_index,
                        group,
                        length,
                        start_domain: domain,
                    });
                }

                if vars.len() > first_var {
                    let mut days = FixedBitSet::with_capacity(num_days as usize);
                    for &day in occurrence.days() {
                        days.insert(day as usize);
                    }
                    nodes.push(OccurrenceNode {
                        occurrence: occurrence_index,
                        quota: quota_index,
                        weekday: occurrence.weekday(),
                        length,
                        days,
                        day_list: occurrence.days().to_vec(),
                        vars: first_var..vars.len(),
                    });
                    quota.nodes.push(node_index);
                }
            }
            quotas.push(quota);
        }

        let capacities = model
            .spaces()
            .iter()
            .map(|space| space.daily_capacity().to_vec())
            .collect();

        tracing::debug!(
            events = quotas.len(),
            nodes = nodes.len(),
            vars = vars.len(),
            groups = groups.len(),
            pruned,
            "constraint model built"
        );

        Self {
            vars,
            nodes,
            quotas,
            groups,
            capacities,
            num_days,
        }
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn num_quotas(&self) -> usize {
        self.quotas.len()
    }

    #[inline]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn num_spaces(&self) -> usize {
        self.capacities.len()
    }

    #[inline]
    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    #[inline]
    pub fn vars(&self) -> &[SelectionVar] {
        &self.vars
    }

    #[inline]
    pub fn nodes(&self) -> &[OccurrenceNode] {
        &self.nodes
    }

    #[inline]
    pub fn quotas(&self) -> &[EventQuota] {
        &self.quotas
    }

    #[inline]
    pub fn groups(&self) -> &[NoOverlapGroup] {
        &self.groups
    }

    /// Returns the variable at `var_index`.
    ///
    /// # Panics
    ///
    /// Panics if `var_index` is not in `0..num_vars()`.
    #[inline]
    pub fn var(&self, var_index: VarIndex) -> &SelectionVar {
        let index = var_index.get();
        debug_assert!(
            index < self.num_vars(),
            "called `ConstraintModel::var` with var index out of bounds: the len is {} but the index is {}",
            self.num_vars(),
            index
        );
        &self.vars[index]
    }

    /// Returns the node at `node_index`.
    ///
    /// # Panics
    ///
    /// Panics if `node_index` is not in `0..num_nodes()`.
    #[inline]
    pub fn node(&self, node_index: NodeIndex) -> &OccurrenceNode {
        let index = node_index.get();
        debug_assert!(
            index < self.num_nodes(),
            "called `ConstraintModel::node` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            index
        );
        &self.nodes[index]
    }

    /// Returns the quota at `quota_index`.
    ///
    /// # Panics
    ///
    /// Panics if `quota_index` is not in `0..num_quotas()`.
    #[inline]
    pub fn quota(&self, quota_index: QuotaIndex) -> &EventQuota {
        let index = quota_index.get();
        debug_assert!(
            index < self.num_quotas(),
            "called `ConstraintModel::quota` with quota index out of bounds: the len is {} but the index is {}",
            self.num_quotas(),
            index
        );
        &self.quotas[index]
    }

    /// Returns the group at `group_index`.
    ///
    /// # Panics
    ///
    /// Panics if `group_index` is not in `0..num_groups()`.
    #[inline]
    pub fn group(&self, group_index: GroupIndex) -> &NoOverlapGroup {
        let index = group_index.get();
        debug_assert!(
            index < self.num_groups(),
            "called `ConstraintModel::group` with group index out of bounds: the len is {} but the index is {}",
            self.num_groups(),
            index
        );
        &self.groups[index]
    }

    /// The budget of `space` on period day `day`.
    #[inline]
    pub fn capacity(&self, space: SpaceIndex, day: u32) -> Tick {
        self.capacities[space.get()][day as usize]
    }

    /// The objective if every quota were filled by its longest possible selection.
    pub fn objective_ceiling(&self) -> Tick {
        self.quotas
            .iter()
            .map(|q| Tick::from(q.limit).min(q.nodes.len() as Tick) * q.length)
            .sum()
    }
}

impl std::fmt::Display for ConstraintModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConstraintModel(vars: {}, nodes: {}, quotas: {}, groups: {})",
            self.num_vars(),
            self.num_nodes(),
            self.num_quotas(),
            self.num_groups()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use seasonal_model::{
        id::{EventId, OccurrenceId, SpaceId},
        model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
        time::{Period, TickResolution},
    };

    fn iv(start: Tick, end: Tick) -> ClosedOpenInterval<Tick> {
        ClosedOpenInterval::new(start, end)
    }

    // Two weeks from Monday 2024-01-01 at quarter-hour resolution.
    fn builder() -> ModelBuilder {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
        )
        .unwrap();
        ModelBuilder::new(period, TickResolution::QUARTER_HOUR)
    }

    #[test]
    fn test_variables_are_pruned_before_creation() {
        let mut b = builder();
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        let small = b.add_space(SpaceSpec::new(SpaceId(2), "Small").with_max_persons(5));
        let closed = b.add_space(SpaceSpec::new(SpaceId(3), "Closed"));
        for day in 0..14 {
            b.add_space_opening(hall, iv(day * 96 + 40, day * 96 + 88));
            b.add_space_opening(small, iv(day * 96 + 40, day * 96 + 88));
        }
        let _ = closed;

        let e = b.add_event(EventSpec::new(EventId(1), "Team", 8).with_num_persons(12));
        b.add_event_space(e, SpaceId(1))
            .add_event_space(e, SpaceId(2))
            .add_event_space(e, SpaceId(3));
        b.add_occurrence(
            e,
            OccurrenceSpec::new(OccurrenceId(1), Weekday::Mon, iv(36, 60)).with_days([0, 7]),
        );
        b.add_occurrence(e, OccurrenceSpec::new(OccurrenceId(2), Weekday::Tue, iv(36, 60)));
        let model = b.build().unwrap();

        let problem = ConstraintModel::build(&model, &[e]);
        assert_eq!(problem.num_nodes(), 1);
        assert_eq!(problem.num_vars(), 1);
        let var = problem.var(VarIndex::new(0));
        assert_eq!(var.space(), hall);
        assert_eq!(var.length(), 8);
        assert_eq!(var.start_domain(), &[iv(40, 53)]);
        assert_eq!(var.domain_size(), 13);
        assert_eq!(problem.quota(QuotaIndex::new(0)).nodes(), &[NodeIndex::new(0)]);
        assert_eq!(problem.objective_ceiling(), 8);
    }

    #[test]
    fn test_start_domain_intersects_all_dates() {
        let mut b = builder();
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        for day in 0..14 {
            b.add_space_opening(hall, iv(day * 96 + 40, day * 96 + 88));
        }
        // An existing booking on the second Monday splits the evening.
        b.add_space_closing(hall, iv(7 * 96 + 60, 7 * 96 + 70));
        let e = b.add_event(EventSpec::new(EventId(1), "Choir", 8));
        b.add_event_space(e, SpaceId(1));
        b.add_occurrence(
            e,
            OccurrenceSpec::new(OccurrenceId(1), Weekday::Mon, iv(40, 88)).with_days([0, 7]),
        );
        let model = b.build().unwrap();

        let problem = ConstraintModel::build(&model, &[e]);
        assert_eq!(
            problem.var(VarIndex::new(0)).start_domain(),
            &[iv(40, 53), iv(70, 81)]
        );
    }

    #[test]
    fn test_groups_and_capacity_budget() {
        let mut b = builder();
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        for day in 0..14 {
            b.add_space_opening(hall, iv(day * 96 + 40, day * 96 + 88));
        }
        b.set_space_daily_budget(hall, Some(6));
        let short = b.add_event(EventSpec::new(EventId(1), "Short", 4));
        let long = b.add_event(EventSpec::new(EventId(2), "Long", 8));
        for (event, id) in [(short, 1), (long, 2)] {
            b.add_event_space(event, SpaceId(1));
            b.add_occurrence(
                event,
                OccurrenceSpec::new(OccurrenceId(id), Weekday::Wed, iv(40, 88)).with_days([2]),
            );
        }
        let model = b.build().unwrap();

        let problem = ConstraintModel::build(&model, &[short, long, short]);
        assert_eq!(problem.num_quotas(), 2);
        assert_eq!(problem.num_nodes(), 1);
        assert_eq!(problem.num_groups(), 1);
        assert_eq!(problem.group(GroupIndex::new(0)).space(), hall);
        assert_eq!(problem.group(GroupIndex::new(0)).weekday(), Weekday::Wed);
        assert_eq!(problem.capacity(hall, 2), 6);
        assert!(problem.quota(QuotaIndex::new(1)).nodes().is_empty());
    }
}
