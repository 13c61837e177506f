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
    branching::decision::Decision,
    monitor::tree_search_monitor::TreeSearchMonitor,
    problem::ConstraintModel,
    solution::BnbSolution,
    state::SearchState,
    stats::BnbStatistics,
};
use std::time::{Duration, Instant};

/// Reports search progress through `tracing` at a fixed interval.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    label: String,
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<i64>,
}

impl LogTreeSearchMonitor {
    pub fn new(label: impl Into<String>, log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            label: label.into(),
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_objective: None,
        }
    }

    fn log_line(&mut self, state: &SearchState, stats: &BnbStatistics) {
        let now = Instant::now();
        tracing::info!(
            worker = %self.label,
            elapsed_s = now.duration_since(self.start_time).as_secs_f64(),
            nodes = stats.nodes_explored,
            depth = state.depth(),
            best = ?self.best_objective,
            granted = state.granted(),
            backtracks = stats.backtracks,
            pruned = stats.prunings_bound + stats.prunings_infeasible,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new("bnb", Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {:?}, clock_check_mask: {})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, problem: &ConstraintModel, _statistics: &BnbStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        tracing::debug!(worker = %self.label, %problem, "search started");
    }

    fn on_descend(&mut self, state: &SearchState, _decision: Decision, stats: &BnbStatistics) {
        if (stats.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, stats);
        }
    }

    fn on_solution_found(&mut self, solution: &BnbSolution, stats: &BnbStatistics) {
        self.best_objective = Some(solution.objective());
        tracing::debug!(
            worker = %self.label,
            objective = solution.objective(),
            nodes = stats.nodes_explored,
            "improving solution"
        );
    }

    fn on_exit_search(&mut self, stats: &BnbStatistics) {
        tracing::debug!(
            worker = %self.label,
            nodes = stats.nodes_explored,
            solutions = stats.solutions_found,
            sequencing_limits = stats.sequencing_limit_hits,
            elapsed = ?self.start_time.elapsed(),
            "search finished"
        );
    }
}
