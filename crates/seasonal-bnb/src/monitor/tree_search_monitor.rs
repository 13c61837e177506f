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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason` for observing and
//! controlling the branch-and-bound search. A monitor can stop the search by
//! returning `SearchCommand::Terminate` from `search_command`.
//!
//! Lifecycle: enter → step → {bound/prune | decisions/descend/backtrack} →
//! solution → exit. Every callback except `name` has an empty default, so a
//! monitor only implements what it needs. Keep callbacks cheap; they run on
//! every node.

use crate::{
    branching::decision::Decision, problem::ConstraintModel, solution::BnbSolution,
    state::SearchState, stats::BnbStatistics,
};
use seasonal_model::time::Tick;

/// Reasons for pruning a search node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The decision violates a quota, a budget or the no-overlap constraint.
    Infeasible,
    /// The bound of the subtree cannot beat the incumbent.
    BoundDominated,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
        }
    }
}

/// What the search should do next.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called when the search starts.
    fn on_enter_search(&mut self, _problem: &ConstraintModel, _statistics: &BnbStatistics) {}

    /// Called when the search ends.
    fn on_exit_search(&mut self, _statistics: &BnbStatistics) {}

    /// Called to determine the next action of the search.
    fn search_command(&mut self, _state: &SearchState, _statistics: &BnbStatistics) -> SearchCommand {
        SearchCommand::Continue
    }

    /// Called at each step of the search.
    fn on_step(&mut self, _state: &SearchState, _statistics: &BnbStatistics) {}

    /// Called when the bound of a node was computed.
    fn on_upper_bound_computed(
        &mut self,
        _state: &SearchState,
        _upper_bound: Tick,
        _statistics: &BnbStatistics,
    ) {
    }

    /// Called when a node or decision is pruned.
    fn on_prune(&mut self, _state: &SearchState, _reason: PruneReason, _statistics: &BnbStatistics) {}

    /// Called when decisions are enqueued for exploration.
    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState,
        _count: usize,
        _statistics: &BnbStatistics,
    ) {
    }

    /// Called after a decision was applied.
    fn on_descend(&mut self, _state: &SearchState, _decision: Decision, _statistics: &BnbStatistics) {}

    /// Called when the search returns to the parent level.
    fn on_backtrack(&mut self, _state: &SearchState, _statistics: &BnbStatistics) {}

    /// Called when an improving solution is found.
    fn on_solution_found(&mut self, _solution: &BnbSolution, _statistics: &BnbStatistics) {}
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, problem: &ConstraintModel, statistics: &BnbStatistics) {
        (**self).on_enter_search(problem, statistics)
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics) {
        (**self).on_exit_search(statistics)
    }

    fn search_command(&mut self, state: &SearchState, statistics: &BnbStatistics) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    fn on_step(&mut self, state: &SearchState, statistics: &BnbStatistics) {
        (**self).on_step(state, statistics)
    }

    fn on_upper_bound_computed(
        &mut self,
        state: &SearchState,
        upper_bound: Tick,
        statistics: &BnbStatistics,
    ) {
        (**self).on_upper_bound_computed(state, upper_bound, statistics)
    }

    fn on_prune(&mut self, state: &SearchState, reason: PruneReason, statistics: &BnbStatistics) {
        (**self).on_prune(state, reason, statistics)
    }

    fn on_decisions_enqueued(&mut self, state: &SearchState, count: usize, statistics: &BnbStatistics) {
        (**self).on_decisions_enqueued(state, count, statistics)
    }

    fn on_descend(&mut self, state: &SearchState, decision: Decision, statistics: &BnbStatistics) {
        (**self).on_descend(state, decision, statistics)
    }

    fn on_backtrack(&mut self, state: &SearchState, statistics: &BnbStatistics) {
        (**self).on_backtrack(state, statistics)
    }

    fn on_solution_found(&mut self, solution: &BnbSolution, statistics: &BnbStatistics) {
        (**self).on_solution_found(solution, statistics)
    }
}
