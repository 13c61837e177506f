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

//! Branch-and-bound over occurrence selections.
//!
//! One search level per occurrence node, in the order chosen by the
//! `DecisionBuilder`. A level offers every admissible variable of its node
//! plus a skip. Quota and capacity are checked when a level is enqueued;
//! the no-overlap constraint is checked lazily, when an assignment is taken
//! from the stack, by sequencing the affected `(space, weekday)` group.
//!
//! The loop is iterative. State changes go through `SearchTrail`, pending
//! decisions live in the frame-structured `SearchStack`, and the root frame
//! is never popped: an empty root level means the tree is exhausted.
//!
//! A node becomes a leaf once every node is decided or no quota can absorb
//! anything more. Leaves resolve concrete start ticks per group and are
//! offered to the incumbent. Inner nodes are cut when the evaluator's bound
//! does not exceed the best objective known, including the one published by
//! other workers through a `SharedIncumbent`.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    eval::evaluator::BoundEvaluator,
    incumbent::SharedIncumbent,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    problem::{ConstraintModel, GroupIndex, NodeIndex, VarIndex},
    result::{BnbOutcome, SolverResult, TerminationReason},
    sequencing::{NoOverlapSequencer, SequencingItem, SequencingOutcome},
    solution::{Assignment, BnbSolution},
    stack::SearchStack,
    state::SearchState,
    stats::BnbStatistics,
    trail::SearchTrail,
};
use seasonal_model::time::Tick;
use smallvec::SmallVec;

/// The search engine. Reusable across runs; internal buffers keep their capacity.
#[derive(Clone, Debug, Default)]
pub struct BnbSolver {
    trail: SearchTrail,
    stack: SearchStack,
    sequencer: NoOverlapSequencer,
}

impl BnbSolver {
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
            sequencer: NoOverlapSequencer::new(),
        }
    }

    /// Creates a solver with buffers sized for `num_nodes` levels and `num_vars` variables.
    #[inline]
    pub fn preallocated(num_nodes: usize, num_vars: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_nodes),
            stack: SearchStack::preallocated(num_nodes, num_vars),
            sequencer: NoOverlapSequencer::new(),
        }
    }

    /// Sets the node limit of the no-overlap sequencer. Sequencing calls that
    /// hit it count as infeasible.
    #[inline]
    pub fn with_sequencing_node_limit(mut self, node_limit: u64) -> Self {
        self.sequencer = NoOverlapSequencer::with_node_limit(node_limit);
        self
    }

    /// Solves `problem` as a standalone, single threaded search.
    #[inline]
    pub fn solve<B, E, S>(
        &mut self,
        problem: &ConstraintModel,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
    ) -> BnbOutcome
    where
        B: DecisionBuilder + ?Sized,
        E: BoundEvaluator + ?Sized,
        S: TreeSearchMonitor,
    {
        self.solve_internal(problem, builder, evaluator, monitor, None)
    }

    /// Solves `problem` while sharing bounds and solutions through `incumbent`.
    #[inline]
    pub fn solve_with_incumbent<B, E, S>(
        &mut self,
        problem: &ConstraintModel,
        builder: &mut B,
        evaluator: &mut E,
        monitor: S,
        incumbent: &SharedIncumbent,
    ) -> BnbOutcome
    where
        B: DecisionBuilder + ?Sized,
        E: BoundEvaluator + ?Sized,
        S: TreeSearchMonitor,
    {
        self.solve_internal(problem, builder, evaluator, monitor, Some(incumbent))
    }

    fn solve_internal<B, E, S>(
        &mut self,
        problem: &ConstraintModel,
        builder: &mut B,
        evaluator: &mut E,
        mut monitor: S,
        incumbent: Option<&SharedIncumbent>,
    ) -> BnbOutcome
    where
        B: DecisionBuilder + ?Sized,
        E: BoundEvaluator + ?Sized,
        S: TreeSearchMonitor,
    {
        let session = BnbSearchSession::new(self, problem, builder, evaluator, &mut monitor, incumbent);
        let outcome = session.run();
        self.reset();
        outcome
    }

    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

impl std::fmt::Display for BnbSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolver(sequencing_node_limit: {})",
            self.sequencer.node_limit()
        )
    }
}

/// State and logic of a single search run.
struct BnbSearchSession<'a, B, E, S>
where
    B: ?Sized,
    E: ?Sized,
{
    solver: &'a mut BnbSolver,
    problem: &'a ConstraintModel,
    builder: &'a mut B,
    evaluator: &'a mut E,
    monitor: &'a mut S,
    incumbent: Option<&'a SharedIncumbent>,
    order: Vec<NodeIndex>,
    state: SearchState,
    best_objective: Option<Tick>,
    best_solution: Option<BnbSolution>,
    stats: BnbStatistics,
    start_time: std::time::Instant,
}

impl<'a, B, E, S> BnbSearchSession<'a, B, E, S>
where
    B: DecisionBuilder + ?Sized,
    E: BoundEvaluator + ?Sized,
    S: TreeSearchMonitor,
{
    fn new(
        solver: &'a mut BnbSolver,
        problem: &'a ConstraintModel,
        builder: &'a mut B,
        evaluator: &'a mut E,
        monitor: &'a mut S,
        incumbent: Option<&'a SharedIncumbent>,
    ) -> Self {
        Self {
            solver,
            problem,
            builder,
            evaluator,
            monitor,
            incumbent,
            order: Vec::new(),
            state: SearchState::new(problem),
            best_objective: incumbent.and_then(SharedIncumbent::best_objective),
            best_solution: None,
            stats: BnbStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbOutcome {
        self.monitor.on_enter_search(self.problem, &self.stats);
        self.initialize();

        let termination_reason = loop {
            self.tighten();
            self.monitor.on_step(&self.state, &self.stats);

            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&self.state, &self.stats) {
                break TerminationReason::Aborted(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break TerminationReason::OptimalityProven;
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    fn finalize_result(self, reason: TerminationReason) -> BnbOutcome {
        match reason {
            TerminationReason::Aborted(msg) => BnbOutcome::aborted(self.best_solution, msg, self.stats),
            reason => {
                let external = self
                    .incumbent
                    .and_then(SharedIncumbent::best_objective)
                    .unwrap_or(Tick::MIN);
                let result = match self.best_solution {
                    Some(solution) if solution.objective() >= external => SolverResult::Optimal(solution),
                    Some(solution) => SolverResult::Feasible(solution),
                    // Everything was dominated by another worker's incumbent.
                    None => SolverResult::Unknown,
                };
                BnbOutcome::new(result, reason, self.stats)
            }
        }
    }

    /// Sets up the root frame and enqueues the root decisions.
    fn initialize(&mut self) {
        self.solver.trail.ensure_capacity(self.problem.num_nodes());
        self.solver
            .stack
            .ensure_capacity(self.problem.num_nodes(), self.problem.num_vars());

        self.order = self.builder.node_order(self.problem);
        debug_assert_eq!(
            self.order.len(),
            self.problem.num_nodes(),
            "DecisionBuilder '{}' returned a node order that is not a permutation",
            self.builder.name()
        );

        self.solver.stack.push_frame();
        self.stats.on_node_explored();

        let root_bound = self.evaluator.upper_bound(self.problem, &self.state);
        self.stats.set_root_upper_bound(root_bound);
        self.expand();
    }

    #[inline]
    fn tighten(&mut self) {
        let external = self.incumbent.and_then(SharedIncumbent::best_objective);
        self.best_objective = self.best_objective.max(external);
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.state.depth() == self.order.len() || self.state.optimistic() == 0
    }

    #[inline]
    fn is_dominated(&self, bound: Tick) -> bool {
        self.best_objective.is_some_and(|best| bound <= best)
    }

    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);
        self.solver.trail.backtrack(self.problem, &mut self.state);
        self.solver.stack.pop_frame();
    }

    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };
        self.stats.on_decision_generated();

        if let Decision::Assign { var, .. } = decision {
            if !self.sequencing_admits(var) {
                self.stats.on_pruning_infeasible();
                self.monitor.on_prune(&self.state, PruneReason::Infeasible, &self.stats);
                return;
            }
        }

        self.descend(decision);
    }

    /// Returns `true` if the group of `var` can still be sequenced with `var` added.
    fn sequencing_admits(&mut self, var: VarIndex) -> bool {
        let group = self.problem.var(var).group();
        if self.state.members(group).is_empty() {
            return true;
        }
        let mut vars: SmallVec<VarIndex, 8> = self.state.members(group).iter().copied().collect();
        vars.push(var);
        self.sequence_group(vars.into_iter()).is_feasible()
    }

    fn sequence_group<I>(&mut self, vars: I) -> SequencingOutcome
    where
        I: Iterator<Item = VarIndex>,
    {
        let problem = self.problem;
        let items: SmallVec<SequencingItem<'_>, 8> = vars
            .map(|v| {
                let var = problem.var(v);
                SequencingItem::new(var.length(), var.start_domain(), problem.node(var.node()).days())
            })
            .collect();
        let outcome = self.solver.sequencer.sequence(&items);
        self.stats
            .on_sequencing(outcome == SequencingOutcome::LimitReached);
        outcome
    }

    fn descend(&mut self, decision: Decision) {
        self.solver.trail.apply(self.problem, &mut self.state, decision);
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        self.expand();
    }

    /// Handles the node the search just arrived at: leaf, bound cut or branching.
    fn expand(&mut self) {
        if self.is_leaf() {
            self.handle_leaf();
            return;
        }

        let bound = self.evaluator.upper_bound(self.problem, &self.state);
        self.monitor.on_upper_bound_computed(&self.state, bound, &self.stats);
        if self.is_dominated(bound) {
            self.stats.on_pruning_bound();
            self.monitor.on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        self.enqueue_decisions();
    }

    fn enqueue_decisions(&mut self) {
        let problem = self.problem;
        let node_index = self.order[self.state.depth()];
        let node = problem.node(node_index);

        let mut candidates: SmallVec<VarIndex, 8> = SmallVec::new();
        if self.state.within_quota(problem, node_index) {
            let state = &self.state;
            candidates.extend(node.vars().filter(|&v| state.fits_capacity(problem, v)));
        }
        self.builder
            .order_assignments(problem, &self.state, &mut candidates);

        // LIFO: skip is explored last, the first candidate first.
        self.solver.stack.push(Decision::Skip { node: node_index });
        self.solver.stack.extend(
            candidates
                .iter()
                .rev()
                .map(|&var| Decision::Assign { node: node_index, var }),
        );
        self.monitor
            .on_decisions_enqueued(&self.state, candidates.len() + 1, &self.stats);
    }

    fn handle_leaf(&mut self) {
        let objective = self.state.granted();
        if self.is_dominated(objective) {
            self.stats.on_pruning_bound();
            self.monitor.on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        let Some(assignments) = self.resolve_starts() else {
            self.stats.on_pruning_infeasible();
            self.monitor.on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return;
        };

        let solution = BnbSolution::new(objective, assignments);
        debug_assert!(solution.is_consistent_with(self.problem));
        self.best_objective = Some(objective);
        if let Some(incumbent) = self.incumbent {
            incumbent.try_install(&solution);
        }
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&solution, &self.stats);
        self.best_solution = Some(solution);
    }

    /// Concrete start ticks for every selected variable, group by group.
    fn resolve_starts(&mut self) -> Option<Vec<Assignment>> {
        let mut assignments = Vec::with_capacity(self.state.depth());
        for group in GroupIndex::range(self.problem.num_groups()) {
            let members: SmallVec<VarIndex, 8> = self.state.members(group).iter().copied().collect();
            if members.is_empty() {
                continue;
            }
            match self.sequence_group(members.iter().copied()) {
                SequencingOutcome::Feasible(starts) => {
                    assignments.extend(
                        members
                            .iter()
                            .zip(starts)
                            .map(|(&var, start)| Assignment { var, start }),
                    );
                }
                SequencingOutcome::Infeasible | SequencingOutcome::LimitReached => return None,
            }
        }
        Some(assignments)
    }
}
