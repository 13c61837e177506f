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

//! Monitoring combinators for tree search
//!
//! `CompositeTreeSearchMonitor` forwards every event to its children in
//! insertion order. `search_command` short-circuits on the first
//! non-`Continue` answer; put stricter stop conditions first.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    problem::ConstraintModel,
    solution::BnbSolution,
    state::SearchState,
    stats::BnbStatistics,
};
use seasonal_model::time::Tick;

pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl Default for CompositeTreeSearchMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M) -> &mut Self
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl std::fmt::Debug for CompositeTreeSearchMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.monitors.iter()).finish()
    }
}

impl TreeSearchMonitor for CompositeTreeSearchMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, problem: &ConstraintModel, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_enter_search(problem, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(&mut self, state: &SearchState, statistics: &BnbStatistics) -> SearchCommand {
        for monitor in self.monitors.iter_mut() {
            if let SearchCommand::Terminate(reason) = monitor.search_command(state, statistics) {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, state: &SearchState, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_step(state, statistics);
        }
    }

    fn on_upper_bound_computed(
        &mut self,
        state: &SearchState,
        upper_bound: Tick,
        statistics: &BnbStatistics,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_upper_bound_computed(state, upper_bound, statistics);
        }
    }

    fn on_prune(&mut self, state: &SearchState, reason: PruneReason, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_prune(state, reason, statistics);
        }
    }

    fn on_decisions_enqueued(&mut self, state: &SearchState, count: usize, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_decisions_enqueued(state, count, statistics);
        }
    }

    fn on_descend(&mut self, state: &SearchState, decision: Decision, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_descend(state, decision, statistics);
        }
    }

    fn on_backtrack(&mut self, state: &SearchState, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_backtrack(state, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &BnbSolution, statistics: &BnbStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_solution_found(solution, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;

    struct StopAfter {
        remaining: usize,
        steps: usize,
    }

    impl TreeSearchMonitor for StopAfter {
        fn name(&self) -> &str {
            "StopAfter"
        }

        fn on_step(&mut self, _state: &SearchState, _statistics: &BnbStatistics) {
            self.steps += 1;
        }

        fn search_command(&mut self, _state: &SearchState, _statistics: &BnbStatistics) -> SearchCommand {
            if self.remaining == 0 {
                SearchCommand::Terminate("done".to_string())
            } else {
                self.remaining -= 1;
                SearchCommand::Continue
            }
        }
    }

    #[test]
    fn test_composite_short_circuits_and_fans_out() {
        use crate::problem::ConstraintModel;
        use chrono::NaiveDate;
        use seasonal_model::{
            model::ModelBuilder,
            time::{Period, TickResolution},
        };

        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let model = ModelBuilder::new(period, TickResolution::QUARTER_HOUR)
            .build()
            .unwrap();
        let problem = ConstraintModel::build(&model, &[]);
        let state = SearchState::new(&problem);
        let stats = BnbStatistics::default();

        let mut first = StopAfter { remaining: 1, steps: 0 };
        let mut second = StopAfter { remaining: 5, steps: 0 };
        {
            let mut composite = CompositeTreeSearchMonitor::with_capacity(3);
            composite
                .add_monitor(&mut first)
                .add_monitor(NoOperationMonitor::new())
                .add_monitor(&mut second);
            assert_eq!(composite.len(), 3);

            composite.on_step(&state, &stats);
            assert_eq!(composite.search_command(&state, &stats), SearchCommand::Continue);
            assert_eq!(
                composite.search_command(&state, &stats),
                SearchCommand::Terminate("done".to_string())
            );
        }
        assert_eq!(first.steps, 1);
        assert_eq!(second.steps, 1);
        // The second monitor was asked once; the terminate answer short-circuited.
        assert_eq!(second.remaining, 4);
    }
}
