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

//! A bound that also respects the remaining daily space budgets.
//!
//! `QuotaBound` alone ignores capacity: once every eligible space is full
//! it still credits each open quota in full, so a saturated subtree can
//! never be pruned. Here every undecided node is charged to its first date.
//! On that date it consumes its length in whichever space it lands in, so the
//! ticks still reachable on a date are capped by the remaining budget of the
//! spaces its nodes can still fit into.

use crate::{
    eval::evaluator::BoundEvaluator,
    problem::{ConstraintModel, NodeIndex},
    state::SearchState,
};
use fixedbitset::FixedBitSet;
use seasonal_model::time::Tick;

/// `granted + min(quota term, Σ_day min(demand, supply))`.
///
/// The quota term is the one `QuotaBound` reads. For each date, `demand` sums
/// the lengths of undecided nodes that start on that date and still have a
/// variable within quota and budget, and `supply` sums the remaining budget
/// of the spaces those variables live in. Evaluation is linear in the number
/// of variables.
#[derive(Debug, Clone, Default)]
pub struct CapacityBound {
    demand: Vec<Tick>,
    supply: Vec<Tick>,
    counted: FixedBitSet,
}

impl CapacityBound {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the scratch buffers for `problem` up front.
    pub fn preallocated(problem: &ConstraintModel) -> Self {
        let mut bound = Self::new();
        bound.reset(problem);
        bound
    }

    fn reset(&mut self, problem: &ConstraintModel) {
        let num_days = problem.num_days() as usize;
        self.demand.clear();
        self.demand.resize(num_days, 0);
        self.supply.clear();
        self.supply.resize(num_days, 0);
        self.counted.clear();
        self.counted.grow(problem.num_spaces() * num_days);
    }

    /// Upper bound on the ticks the undecided nodes can still add given the
    /// remaining budgets.
    fn capacity_term(&mut self, problem: &ConstraintModel, state: &SearchState) -> Tick {
        self.reset(problem);
        let num_days = problem.num_days() as usize;
        for node_index in NodeIndex::range(problem.num_nodes()) {
            if state.is_decided(node_index) || !state.within_quota(problem, node_index) {
                continue;
            }
            let node = problem.node(node_index);
            let Some(&day) = node.day_list().first() else {
                continue;
            };
            let mut viable = false;
            for var_index in node.vars() {
                if !state.fits_capacity(problem, var_index) {
                    continue;
                }
                viable = true;
                let space = problem.var(var_index).space();
                if !self.counted.put(space.get() * num_days + day as usize) {
                    self.supply[day as usize] +=
                        problem.capacity(space, day) - state.used_capacity(space, day);
                }
            }
            if viable {
                self.demand[day as usize] += node.length();
            }
        }
        self.demand
            .iter()
            .zip(&self.supply)
            .map(|(&demand, &supply)| demand.min(supply))
            .sum()
    }
}

impl BoundEvaluator for CapacityBound {
    fn name(&self) -> &str {
        "CapacityBound"
    }

    fn upper_bound(&mut self, problem: &ConstraintModel, state: &SearchState) -> Tick {
        let by_quota = state.optimistic();
        if by_quota == 0 {
            return state.granted();
        }
        state.granted() + by_quota.min(self.capacity_term(problem, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{branching::decision::Decision, eval::quota::QuotaBound, problem::VarIndex};
    use chrono::{NaiveDate, Weekday};
    use seasonal_core::math::interval::ClosedOpenInterval;
    use seasonal_model::{
        id::{EventId, OccurrenceId, SpaceId},
        index::EventIndex,
        model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
        time::{Period, TickResolution},
    };

    fn builder() -> ModelBuilder {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        ModelBuilder::new(period, TickResolution::QUARTER_HOUR)
    }

    /// `count` identical 8-tick Monday events competing for a 48-tick hall.
    fn saturated_hall(count: u64) -> ConstraintModel {
        let mut b = builder();
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        b.add_space_opening(hall, ClosedOpenInterval::new(40, 88));
        for id in 1..=count {
            let e = b.add_event(EventSpec::new(EventId(id), format!("Team {id}"), 8));
            b.add_event_space(e, SpaceId(1));
            b.add_occurrence(
                e,
                OccurrenceSpec::new(OccurrenceId(id), Weekday::Mon, ClosedOpenInterval::new(40, 88))
                    .with_days([0]),
            );
        }
        let model = b.build().unwrap();
        let events: Vec<EventIndex> = EventIndex::range(count as usize).collect();
        ConstraintModel::build(&model, &events)
    }

    fn assign(problem: &ConstraintModel, state: &mut SearchState, node: usize) {
        let node = NodeIndex::new(node);
        let var: VarIndex = problem.node(node).vars().next().unwrap();
        state.apply(problem, Decision::Assign { node, var });
    }

    #[test]
    fn test_root_bound_is_capped_by_budget() {
        let p = saturated_hall(10);
        let state = SearchState::new(&p);
        assert_eq!(QuotaBound::new().upper_bound(&p, &state), 80);
        assert_eq!(CapacityBound::new().upper_bound(&p, &state), 48);
    }

    #[test]
    fn test_full_hall_collapses_to_granted() {
        let p = saturated_hall(40);
        let mut state = SearchState::new(&p);
        let mut bound = CapacityBound::preallocated(&p);
        for node in 0..6 {
            assign(&p, &mut state, node);
        }
        assert_eq!(state.granted(), 48);
        assert_eq!(bound.upper_bound(&p, &state), 48);
        assert!(QuotaBound::new().upper_bound(&p, &state) > 48);
    }

    #[test]
    fn test_skipping_keeps_the_remaining_budget_reachable() {
        let p = saturated_hall(8);
        let mut state = SearchState::new(&p);
        let mut bound = CapacityBound::new();
        for node in 0..5 {
            assign(&p, &mut state, node);
        }
        state.apply(&p, Decision::Skip { node: NodeIndex::new(5) });
        assert_eq!(bound.upper_bound(&p, &state), 48);

        state.apply(&p, Decision::Skip { node: NodeIndex::new(6) });
        state.apply(&p, Decision::Skip { node: NodeIndex::new(7) });
        assert_eq!(bound.upper_bound(&p, &state), 40);
    }

    #[test]
    fn test_supply_counts_every_eligible_space_once() {
        let mut b = builder();
        for (id, name) in [(1, "Hall"), (2, "Gym")] {
            let space = b.add_space(SpaceSpec::new(SpaceId(id), name));
            b.add_space_opening(space, ClosedOpenInterval::new(40, 56));
        }
        for id in 1..=5 {
            let e = b.add_event(EventSpec::new(EventId(id), format!("Team {id}"), 8));
            b.add_event_space(e, SpaceId(1));
            b.add_event_space(e, SpaceId(2));
            b.add_occurrence(
                e,
                OccurrenceSpec::new(OccurrenceId(id), Weekday::Mon, ClosedOpenInterval::new(40, 56))
                    .with_days([0]),
            );
        }
        let model = b.build().unwrap();
        let p = ConstraintModel::build(&model, &EventIndex::range(5).collect::<Vec<_>>());
        let state = SearchState::new(&p);
        assert_eq!(QuotaBound::new().upper_bound(&p, &state), 40);
        assert_eq!(CapacityBound::new().upper_bound(&p, &state), 32);
    }
}
