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

//! Most-constrained-first branching.
//!
//! Occurrences with few candidate spaces, and among those the ones with the
//! fewest start options, are decided first so that conflicts surface near
//! the root. Candidates are ordered by the load already placed in their
//! `(space, weekday)` group, least loaded first.

use crate::{
    branching::decision::DecisionBuilder,
    problem::{ConstraintModel, NodeIndex, VarIndex},
    state::SearchState,
};
use seasonal_model::time::Tick;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MostConstrainedBuilder;

impl MostConstrainedBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

fn total_domain(problem: &ConstraintModel, node: NodeIndex) -> Tick {
    problem
        .node(node)
        .vars()
        .map(|v| problem.var(v).domain_size())
        .sum()
}

impl DecisionBuilder for MostConstrainedBuilder {
    fn name(&self) -> &str {
        "MostConstrainedBuilder"
    }

    fn node_order(&mut self, problem: &ConstraintModel) -> Vec<NodeIndex> {
        let mut order: Vec<NodeIndex> = NodeIndex::range(problem.num_nodes()).collect();
        order.sort_by_cached_key(|&n| (problem.node(n).num_vars(), total_domain(problem, n), n));
        order
    }

    fn order_assignments(
        &mut self,
        problem: &ConstraintModel,
        state: &SearchState,
        candidates: &mut [VarIndex],
    ) {
        candidates.sort_by_cached_key(|&v| {
            let var = problem.var(v);
            (state.group_load(problem, var.group()), var.domain_size(), v)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::{input_order::InputOrderBuilder, longest_first::LongestFirstBuilder};
    use chrono::{NaiveDate, Weekday};
    use seasonal_core::math::interval::ClosedOpenInterval;
    use seasonal_model::{
        id::{EventId, OccurrenceId, SpaceId},
        index::EventIndex,
        model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
        time::{Period, TickResolution},
    };

    fn iv(start: Tick, end: Tick) -> ClosedOpenInterval<Tick> {
        ClosedOpenInterval::new(start, end)
    }

    // Event 1: short, two spaces. Event 2: long, only the hall.
    fn problem() -> ConstraintModel {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let mut b = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        let gym = b.add_space(SpaceSpec::new(SpaceId(2), "Gym"));
        b.add_space_opening(hall, iv(40, 88));
        b.add_space_opening(gym, iv(40, 60));
        let short = b.add_event(EventSpec::new(EventId(1), "Short", 4));
        b.add_event_space(short, SpaceId(1)).add_event_space(short, SpaceId(2));
        b.add_occurrence(
            short,
            OccurrenceSpec::new(OccurrenceId(1), Weekday::Mon, iv(40, 88)).with_days([0]),
        );
        let long = b.add_event(EventSpec::new(EventId(2), "Long", 12));
        b.add_event_space(long, SpaceId(1));
        b.add_occurrence(
            long,
            OccurrenceSpec::new(OccurrenceId(2), Weekday::Mon, iv(40, 88)).with_days([0]),
        );
        let model = b.build().unwrap();
        ConstraintModel::build(&model, &[EventIndex::new(0), EventIndex::new(1)])
    }

    #[test]
    fn test_node_orders_are_permutations() {
        let p = problem();
        let mut builders: Vec<Box<dyn DecisionBuilder>> = vec![
            Box::new(InputOrderBuilder::new()),
            Box::new(LongestFirstBuilder::new()),
            Box::new(MostConstrainedBuilder::new()),
        ];
        for builder in builders.iter_mut() {
            let mut order = builder.node_order(&p);
            order.sort_unstable();
            assert_eq!(order, vec![NodeIndex::new(0), NodeIndex::new(1)], "{}", builder.name());
        }
    }

    #[test]
    fn test_strategies_prefer_their_nodes() {
        let p = problem();
        assert_eq!(
            LongestFirstBuilder::new().node_order(&p),
            vec![NodeIndex::new(1), NodeIndex::new(0)]
        );
        assert_eq!(
            MostConstrainedBuilder::new().node_order(&p),
            vec![NodeIndex::new(1), NodeIndex::new(0)]
        );
        assert_eq!(
            InputOrderBuilder::new().node_order(&p),
            vec![NodeIndex::new(0), NodeIndex::new(1)]
        );
    }

    #[test]
    fn test_candidate_ordering() {
        let p = problem();
        let state = SearchState::new(&p);
        // Var 0: short in the hall (48 ticks of budget), var 1: short in the gym (20).
        let mut candidates = [VarIndex::new(1), VarIndex::new(0)];
        LongestFirstBuilder::new().order_assignments(&p, &state, &mut candidates);
        assert_eq!(candidates, [VarIndex::new(0), VarIndex::new(1)]);

        // The gym has the smaller domain while both groups are empty.
        let mut candidates = [VarIndex::new(0), VarIndex::new(1)];
        MostConstrainedBuilder::new().order_assignments(&p, &state, &mut candidates);
        assert_eq!(candidates, [VarIndex::new(1), VarIndex::new(0)]);
    }
}
