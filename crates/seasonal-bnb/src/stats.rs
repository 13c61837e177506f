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

use seasonal_model::time::Tick;
use std::time::Duration;

/// Statistics collected during one branch-and-bound run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BnbStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Levels abandoned after all their decisions were explored.
    pub backtracks: u64,
    /// Total decisions taken from the stack.
    pub decisions_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Children rejected by quota, capacity or no-overlap.
    pub prunings_infeasible: u64,
    /// Nodes cut because their bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Improving solutions found by this run.
    pub solutions_found: u64,
    /// Calls into the no-overlap sequencer.
    pub sequencing_calls: u64,
    /// Sequencer calls that gave up at their node limit.
    pub sequencing_limit_hits: u64,
    /// The bound of the root node.
    pub root_upper_bound: Tick,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl BnbStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_sequencing(&mut self, limit_reached: bool) {
        self.sequencing_calls = self.sequencing_calls.saturating_add(1);
        if limit_reached {
            self.sequencing_limit_hits = self.sequencing_limit_hits.saturating_add(1);
        }
    }

    #[inline]
    pub fn set_root_upper_bound(&mut self, bound: Tick) {
        self.root_upper_bound = bound;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for BnbStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Seasonal-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:  {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Sequencing calls:     {}", self.sequencing_calls)?;
        writeln!(f, "  Sequencing limits:    {}", self.sequencing_limit_hits)?;
        writeln!(f, "  Root upper bound:     {}", self.root_upper_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = BnbStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_depth_update(3);
        stats.on_depth_update(1);
        stats.on_sequencing(false);
        stats.on_sequencing(true);
        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.sequencing_calls, 2);
        assert_eq!(stats.sequencing_limit_hits, 1);
        let text = format!("{}", stats);
        assert!(text.contains("Nodes explored:       2"));
    }
}
