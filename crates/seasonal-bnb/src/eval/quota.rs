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

use crate::{eval::evaluator::BoundEvaluator, problem::ConstraintModel, state::SearchState};
use seasonal_model::time::Tick;

/// `granted + Σ min(limit - used, undecided) * length` over all quotas.
///
/// Read from counters the state maintains incrementally, so evaluation is O(1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaBound;

impl QuotaBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl BoundEvaluator for QuotaBound {
    fn name(&self) -> &str {
        "QuotaBound"
    }

    #[inline]
    fn upper_bound(&mut self, _problem: &ConstraintModel, state: &SearchState) -> Tick {
        state.granted() + state.optimistic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::loose::LooseBound;
    use crate::{
        branching::decision::Decision,
        problem::{NodeIndex, VarIndex},
    };
    use chrono::{NaiveDate, Weekday};
    use seasonal_core::math::interval::ClosedOpenInterval;
    use seasonal_model::{
        id::{EventId, OccurrenceId, SpaceId},
        index::EventIndex,
        model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
        time::{Period, TickResolution},
    };

    fn problem() -> ConstraintModel {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let mut b = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        b.add_space_opening(hall, ClosedOpenInterval::new(0, 96));
        let e = b.add_event(EventSpec::new(EventId(1), "Team", 6));
        b.add_event_space(e, SpaceId(1));
        for (id, weekday, day) in [(1, Weekday::Mon, 0), (2, Weekday::Tue, 1), (3, Weekday::Wed, 2)] {
            b.add_occurrence(
                e,
                OccurrenceSpec::new(OccurrenceId(id), weekday, ClosedOpenInterval::new(40, 80))
                    .with_days([day]),
            );
        }
        let model = b.build().unwrap();
        ConstraintModel::build(&model, &[EventIndex::new(0)])
    }

    #[test]
    fn test_quota_bound_respects_events_per_week() {
        let p = problem();
        let mut state = SearchState::new(&p);
        let mut quota = QuotaBound::new();
        let mut loose = LooseBound::new();
        assert_eq!(quota.upper_bound(&p, &state), 6);
        assert_eq!(loose.upper_bound(&p, &state), 18);

        state.apply(
            &p,
            Decision::Assign {
                node: NodeIndex::new(0),
                var: VarIndex::new(0),
            },
        );
        assert_eq!(quota.upper_bound(&p, &state), 6);
        assert_eq!(loose.upper_bound(&p, &state), 18);

        let mut skip_first = SearchState::new(&p);
        skip_first.apply(&p, Decision::Skip { node: NodeIndex::new(0) });
        assert_eq!(quota.upper_bound(&p, &skip_first), 6);
        assert_eq!(loose.upper_bound(&p, &skip_first), 12);
    }
}
