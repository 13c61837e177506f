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

use crate::{
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    solution::BnbSolution,
    state::SearchState,
    stats::BnbStatistics,
};
use std::time::Instant;

/// Terminates the search once a deadline has passed.
///
/// The clock is read only when `steps & clock_check_mask == 0`.
///
/// With [`TimeLimitMonitor::after_first_dive`] the deadline is ignored until
/// the first descent has reached a leaf or been pruned, so even an expired
/// budget yields the greedy solution of that dive.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    deadline: Instant,
    clock_check_mask: u64,
    steps: u64,
    diving: bool,
}

impl TimeLimitMonitor {
    pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    pub fn new(deadline: Instant, clock_check_mask: u64) -> Self {
        Self {
            deadline,
            clock_check_mask,
            steps: 0,
            diving: false,
        }
    }

    /// Defers the deadline until the first dive is over.
    pub fn after_first_dive(mut self) -> Self {
        self.diving = true;
        self
    }

    fn end_dive(&mut self) {
        if self.diving {
            self.diving = false;
            // Read the clock on the next command.
            self.steps = 0;
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self::new(deadline, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn search_command(&mut self, _state: &SearchState, _statistics: &BnbStatistics) -> SearchCommand {
        if self.diving {
            return SearchCommand::Continue;
        }
        let step = self.steps;
        self.steps = self.steps.wrapping_add(1);
        if step & self.clock_check_mask == 0 && Instant::now() >= self.deadline {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }

    fn on_backtrack(&mut self, _state: &SearchState, _statistics: &BnbStatistics) {
        self.end_dive();
    }

    fn on_solution_found(&mut self, _solution: &BnbSolution, _statistics: &BnbStatistics) {
        self.end_dive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ConstraintModel;
    use chrono::NaiveDate;
    use seasonal_model::{
        model::ModelBuilder,
        time::{Period, TickResolution},
    };
    use std::time::Duration;

    fn empty_state() -> SearchState {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let model = ModelBuilder::new(period, TickResolution::QUARTER_HOUR)
            .build()
            .unwrap();
        SearchState::new(&ConstraintModel::build(&model, &[]))
    }

    #[test]
    fn test_expired_deadline_terminates_on_first_check() {
        let state = empty_state();
        let stats = BnbStatistics::default();
        let mut monitor = TimeLimitMonitor::with_deadline(Instant::now());
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_first_dive_defers_an_expired_deadline() {
        let state = empty_state();
        let stats = BnbStatistics::default();
        let mut monitor = TimeLimitMonitor::with_deadline(Instant::now()).after_first_dive();
        for _ in 0..10 {
            assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        }
        monitor.on_backtrack(&state, &stats);
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_future_deadline_continues() {
        let state = empty_state();
        let stats = BnbStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Instant::now() + Duration::from_secs(3600), 0);
        for _ in 0..10 {
            assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        }
    }
}
