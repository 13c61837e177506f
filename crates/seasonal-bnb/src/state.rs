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

//! Incremental search state.
//!
//! `SearchState` holds everything that changes while the search walks the
//! tree: the decided variable of every occurrence node, the members of every
//! no-overlap group, the ticks already charged against each space and day,
//! and the per-quota counters.
//!
//! Two aggregate values are maintained incrementally on every `apply` and
//! `undo` so that bounds stay O(1):
//!
//! - `granted`: the objective of the partial assignment,
//! - `optimistic`: the most the undecided nodes could still add when every
//!   quota is filled, `Σ min(limit - used, undecided) * length`.
//!
//! Group members are kept in LIFO order; `undo` must be called in reverse
//! order of `apply`.

use crate::{
    branching::decision::Decision,
    problem::{ConstraintModel, GroupIndex, NodeIndex, QuotaIndex, VarIndex},
};
use seasonal_model::{index::SpaceIndex, time::Tick};

#[derive(Debug, Clone)]
pub struct SearchState {
    assignments: Vec<Option<VarIndex>>,
    decided: Vec<bool>,
    members: Vec<Vec<VarIndex>>,
    used_capacity: Vec<Vec<Tick>>,
    quota_used: Vec<u32>,
    undecided: Vec<u32>,
    granted: Tick,
    optimistic: Tick,
    remaining: Tick,
    depth: usize,
}

impl SearchState {
    /// Creates the root state of `problem`: nothing decided, nothing granted.
    pub fn new(problem: &ConstraintModel) -> Self {
        let undecided: Vec<u32> = problem
            .quotas()
            .iter()
            .map(|q| q.nodes().len() as u32)
            .collect();
        let optimistic = problem.objective_ceiling();
        let remaining = problem
            .quotas()
            .iter()
            .map(|q| q.nodes().len() as Tick * q.length())
            .sum();

        Self {
            assignments: vec![None; problem.num_nodes()],
            decided: vec![false; problem.num_nodes()],
            members: vec![Vec::new(); problem.num_groups()],
            used_capacity: vec![vec![0; problem.num_days() as usize]; problem.num_spaces()],
            quota_used: vec![0; problem.num_quotas()],
            undecided,
            granted: 0,
            optimistic,
            remaining,
            depth: 0,
        }
    }

    /// Objective of the current partial assignment.
    #[inline]
    pub fn granted(&self) -> Tick {
        self.granted
    }

    /// Upper bound on what the undecided nodes can add under the quotas.
    #[inline]
    pub fn optimistic(&self) -> Tick {
        self.optimistic
    }

    /// Total length of all undecided nodes, ignoring quotas.
    #[inline]
    pub fn remaining(&self) -> Tick {
        self.remaining
    }

    /// Number of decisions applied.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn assignment(&self, node: NodeIndex) -> Option<VarIndex> {
        self.assignments[node.get()]
    }

    #[inline]
    pub fn is_decided(&self, node: NodeIndex) -> bool {
        self.decided[node.get()]
    }

    /// Variables currently selected in `group`, in the order they were added.
    #[inline]
    pub fn members(&self, group: GroupIndex) -> &[VarIndex] {
        &self.members[group.get()]
    }

    #[inline]
    pub fn used_capacity(&self, space: SpaceIndex, day: u32) -> Tick {
        self.used_capacity[space.get()][day as usize]
    }

    #[inline]
    pub fn quota_used(&self, quota: QuotaIndex) -> u32 {
        self.quota_used[quota.get()]
    }

    /// All selected variables.
    pub fn selected(&self) -> impl Iterator<Item = VarIndex> + '_ {
        self.assignments.iter().filter_map(|a| *a)
    }

    /// Returns `true` if the quota of `node` has room for one more selection.
    #[inline]
    pub fn within_quota(&self, problem: &ConstraintModel, node: NodeIndex) -> bool {
        let quota = problem.node(node).quota();
        self.quota_used[quota.get()] < problem.quota(quota).limit()
    }

    /// Returns `true` if selecting `var` keeps every date of its node within budget.
    pub fn fits_capacity(&self, problem: &ConstraintModel, var: VarIndex) -> bool {
        let v = problem.var(var);
        let space = v.space();
        problem
            .node(v.node())
            .day_list()
            .iter()
            .all(|&day| self.used_capacity(space, day) + v.length() <= problem.capacity(space, day))
    }

    /// The group load: total length of all members.
    pub fn group_load(&self, problem: &ConstraintModel, group: GroupIndex) -> Tick {
        self.members(group)
            .iter()
            .map(|&v| problem.var(v).length())
            .sum()
    }

    #[inline]
    fn quota_potential(&self, problem: &ConstraintModel, quota: QuotaIndex) -> Tick {
        let q = problem.quota(quota);
        let open = q.limit().saturating_sub(self.quota_used[quota.get()]);
        Tick::from(open.min(self.undecided[quota.get()])) * q.length()
    }

    /// Applies `decision` to the state.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the node of `decision` is already decided.
    pub fn apply(&mut self, problem: &ConstraintModel, decision: Decision) {
        let node_index = decision.node();
        debug_assert!(
            !self.decided[node_index.get()],
            "called `SearchState::apply` with already decided node: {}",
            node_index
        );
        let node = problem.node(node_index);
        let quota = node.quota();

        self.optimistic -= self.quota_potential(problem, quota);
        self.undecided[quota.get()] -= 1;
        self.remaining -= node.length();

        if let Decision::Assign { var, .. } = decision {
            let v = problem.var(var);
            self.quota_used[quota.get()] += 1;
            self.granted += v.length();
            self.members[v.group().get()].push(var);
            let space = v.space().get();
            for &day in node.day_list() {
                self.used_capacity[space][day as usize] += v.length();
            }
            self.assignments[node_index.get()] = Some(var);
        }

        self.optimistic += self.quota_potential(problem, quota);
        self.decided[node_index.get()] = true;
        self.depth += 1;
    }

    /// Reverts `decision`, which must be the most recently applied one.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the node of `decision` is not decided or if
    /// an assignment is undone out of order.
    pub fn undo(&mut self, problem: &ConstraintModel, decision: Decision) {
        let node_index = decision.node();
        debug_assert!(
            self.decided[node_index.get()],
            "called `SearchState::undo` with undecided node: {}",
            node_index
        );
        let node = problem.node(node_index);
        let quota = node.quota();

        self.optimistic -= self.quota_potential(problem, quota);

        if let Decision::Assign { var, .. } = decision {
            let v = problem.var(var);
            self.quota_used[quota.get()] -= 1;
            self.granted -= v.length();
            let popped = self.members[v.group().get()].pop();
            debug_assert_eq!(
                popped,
                Some(var),
                "called `SearchState::undo` out of order for group {}",
                v.group()
            );
            let space = v.space().get();
            for &day in node.day_list() {
                self.used_capacity[space][day as usize] -= v.length();
            }
            self.assignments[node_index.get()] = None;
        }

        self.undecided[quota.get()] += 1;
        self.remaining += node.length();
        self.optimistic += self.quota_potential(problem, quota);
        self.decided[node_index.get()] = false;
        self.depth -= 1;
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(depth: {}, granted: {}, optimistic: {})",
            self.depth, self.granted, self.optimistic
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use seasonal_core::math::interval::ClosedOpenInterval;
    use seasonal_model::{
        id::{EventId, OccurrenceId, SpaceId},
        model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
        time::{Period, TickResolution},
    };

    fn iv(start: Tick, end: Tick) -> ClosedOpenInterval<Tick> {
        ClosedOpenInterval::new(start, end)
    }

    // One event, three Monday occurrences, quota of two, one hall with a budget of 10 ticks.
    fn problem() -> ConstraintModel {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let mut b = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        b.add_space_opening(hall, iv(40, 88));
        b.set_space_daily_budget(hall, Some(10));
        let e = b.add_event(EventSpec::new(EventId(1), "Team", 4).with_events_per_week(2));
        b.add_event_space(e, SpaceId(1));
        for id in 1..=3 {
            b.add_occurrence(
                e,
                OccurrenceSpec::new(OccurrenceId(id), Weekday::Mon, iv(40, 88)).with_days([0]),
            );
        }
        let model = b.build().unwrap();
        ConstraintModel::build(&model, &[seasonal_model::index::EventIndex::new(0)])
    }

    #[test]
    fn test_root_state_counters() {
        let p = problem();
        let s = SearchState::new(&p);
        assert_eq!(s.granted(), 0);
        assert_eq!(s.optimistic(), 8);
        assert_eq!(s.remaining(), 12);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_apply_and_undo_restore_state() {
        let p = problem();
        let mut s = SearchState::new(&p);
        let hall = SpaceIndex::new(0);

        let first = Decision::Assign {
            node: NodeIndex::new(0),
            var: VarIndex::new(0),
        };
        s.apply(&p, first);
        assert_eq!(s.granted(), 4);
        assert_eq!(s.optimistic(), 4);
        assert_eq!(s.used_capacity(hall, 0), 4);
        assert_eq!(s.members(GroupIndex::new(0)), &[VarIndex::new(0)]);
        assert!(s.within_quota(&p, NodeIndex::new(1)));

        let skip = Decision::Skip {
            node: NodeIndex::new(1),
        };
        s.apply(&p, skip);
        assert_eq!(s.optimistic(), 4);
        assert_eq!(s.remaining(), 4);

        let third = Decision::Assign {
            node: NodeIndex::new(2),
            var: VarIndex::new(2),
        };
        assert!(s.fits_capacity(&p, VarIndex::new(2)));
        s.apply(&p, third);
        assert_eq!(s.granted(), 8);
        assert_eq!(s.optimistic(), 0);
        assert!(!s.fits_capacity(&p, VarIndex::new(1)));
        assert_eq!(s.selected().count(), 2);

        s.undo(&p, third);
        s.undo(&p, skip);
        s.undo(&p, first);
        assert_eq!(s.granted(), 0);
        assert_eq!(s.optimistic(), 8);
        assert_eq!(s.remaining(), 12);
        assert_eq!(s.used_capacity(hall, 0), 0);
        assert!(s.members(GroupIndex::new(0)).is_empty());
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_quota_exhaustion() {
        let p = problem();
        let mut s = SearchState::new(&p);
        s.apply(
            &p,
            Decision::Assign {
                node: NodeIndex::new(0),
                var: VarIndex::new(0),
            },
        );
        s.apply(
            &p,
            Decision::Assign {
                node: NodeIndex::new(1),
                var: VarIndex::new(1),
            },
        );
        assert!(!s.within_quota(&p, NodeIndex::new(2)));
        assert_eq!(s.optimistic(), 0);
        assert_eq!(s.quota_used(QuotaIndex::new(0)), 2);
    }
}
