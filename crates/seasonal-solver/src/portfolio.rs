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

//! # Portfolio Search
//!
//! Runs several branching strategies on the same `ConstraintModel` in
//! scoped threads. The workers share one `SharedIncumbent`, so a solution
//! found by any of them tightens the bound of all others, and the first
//! worker that finishes its tree stops the rest.
//!
//! Every worker gets its own monitor stack:
//!
//! - an `InterruptMonitor` on the portfolio stop flag,
//! - an `InterruptMonitor` on the run's `CancelHandle`,
//! - a `TimeLimitMonitor` when the run has a deadline; it lets the first
//!   dive finish, so every worker returns at least its greedy solution,
//! - a `LogTreeSearchMonitor` for progress lines.

use crate::{config::Strategy, context::RunContext};
use seasonal_bnb::{
    bnb::BnbSolver,
    eval::capacity::CapacityBound,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        log::LogTreeSearchMonitor, time_limit::TimeLimitMonitor,
    },
    problem::ConstraintModel,
    result::{BnbOutcome, TerminationReason},
    solution::BnbSolution,
    stats::BnbStatistics,
};
use serde::Serialize;
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

const LOG_CLOCK_CHECK_MASK: u64 = 0x0FFF;

/// How the search of one tier ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The tree was exhausted; the solution is optimal.
    Optimal,
    /// Stopped early with a solution that may not be optimal.
    Feasible,
    /// Proven to have no solution.
    Infeasible,
    /// Stopped early without any solution.
    Timeout,
}

impl SolveStatus {
    #[inline]
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// What one worker thread returned.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    strategy: Strategy,
    termination_reason: TerminationReason,
    statistics: BnbStatistics,
}

impl WorkerReport {
    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbStatistics {
        &self.statistics
    }
}

/// The combined result of all workers.
#[derive(Debug, Clone)]
pub struct PortfolioOutcome {
    status: SolveStatus,
    solution: Option<BnbSolution>,
    workers: Vec<WorkerReport>,
    elapsed: Duration,
}

impl PortfolioOutcome {
    #[inline]
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// The best solution over all workers, if any.
    #[inline]
    pub fn solution(&self) -> Option<&BnbSolution> {
        self.solution.as_ref()
    }

    #[inline]
    pub fn into_solution(self) -> Option<BnbSolution> {
        self.solution
    }

    #[inline]
    pub fn workers(&self) -> &[WorkerReport] {
        &self.workers
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Nodes explored, summed over all workers.
    pub fn nodes_explored(&self) -> u64 {
        self.workers
            .iter()
            .map(|w| w.statistics.nodes_explored)
            .sum()
    }
}

impl std::fmt::Display for PortfolioOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioOutcome(status: {}, objective: {:?}, workers: {}, elapsed: {:?})",
            self.status,
            self.solution.as_ref().map(BnbSolution::objective),
            self.workers.len(),
            self.elapsed
        )
    }
}

/// Parallel search over the strategies of a `RunContext`.
#[derive(Debug)]
pub struct Portfolio<'c> {
    ctx: &'c RunContext,
    incumbent: SharedIncumbent,
    stop_signal: AtomicBool,
}

impl<'c> Portfolio<'c> {
    pub fn new(ctx: &'c RunContext) -> Self {
        Self {
            ctx,
            incumbent: SharedIncumbent::new(),
            stop_signal: AtomicBool::new(false),
        }
    }

    /// Convenience wrapper for `Portfolio::new(ctx).solve(problem)`.
    pub fn solve_once(problem: &ConstraintModel, ctx: &RunContext) -> PortfolioOutcome {
        Portfolio::new(ctx).solve(problem)
    }

    pub fn solve(&mut self, problem: &ConstraintModel) -> PortfolioOutcome {
        let start_time = Instant::now();
        self.stop_signal.store(false, Ordering::Relaxed);
        self.incumbent = SharedIncumbent::new();

        let workers = self.run_workers(problem);
        self.construct_outcome(start_time, workers)
    }

    fn run_workers(&self, problem: &ConstraintModel) -> Vec<(WorkerReport, Option<BnbSolution>)> {
        let config = self.ctx.config();
        let strategies = config.active_strategies();
        let deadline = self.ctx.deadline();
        let cancel = self.ctx.cancel_handle().flag();
        let stop_signal = &self.stop_signal;
        let incumbent = &self.incumbent;
        let log_interval = config.log_interval();
        let node_limit = config.sequencing_node_limit;
        let label = self.ctx.label();

        let mut results = Vec::with_capacity(strategies.len());

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(strategies.len());

            for &strategy in strategies {
                let handle = scope.spawn(move || {
                    let mut monitor = CompositeTreeSearchMonitor::with_capacity(4);
                    monitor.add_monitor(InterruptMonitor::new(stop_signal));
                    monitor.add_monitor(InterruptMonitor::new(cancel));
                    if let Some(deadline) = deadline {
                        monitor.add_monitor(
                            TimeLimitMonitor::with_deadline(deadline).after_first_dive(),
                        );
                    }
                    monitor.add_monitor(LogTreeSearchMonitor::new(
                        format!("{}/{}", label, strategy),
                        log_interval,
                        LOG_CLOCK_CHECK_MASK,
                    ));

                    let mut builder = strategy.builder();
                    let mut evaluator = CapacityBound::preallocated(problem);
                    let mut solver = BnbSolver::preallocated(problem.num_nodes(), problem.num_vars())
                        .with_sequencing_node_limit(node_limit);
                    let outcome = solver.solve_with_incumbent(
                        problem,
                        &mut builder,
                        &mut evaluator,
                        monitor,
                        incumbent,
                    );

                    if !matches!(outcome.termination_reason(), TerminationReason::Aborted(_)) {
                        tracing::debug!(%strategy, "search finished, stopping the other workers");
                        stop_signal.store(true, Ordering::Relaxed);
                    }
                    outcome
                });
                handles.push((strategy, handle));
            }

            for (strategy, handle) in handles {
                match handle.join() {
                    Ok(outcome) => results.push(worker_report(strategy, outcome)),
                    Err(_) => {
                        tracing::warn!(%strategy, "search worker panicked, its result is discarded")
                    }
                }
            }
        });

        results
    }

    fn construct_outcome(
        &self,
        start_time: Instant,
        results: Vec<(WorkerReport, Option<BnbSolution>)>,
    ) -> PortfolioOutcome {
        let mut workers = Vec::with_capacity(results.len());
        let mut best = self.incumbent.take();
        for (report, solution) in results {
            if let Some(solution) = solution {
                let improves = best
                    .as_ref()
                    .is_none_or(|b| solution.objective() > b.objective());
                if improves {
                    best = Some(solution);
                }
            }
            workers.push(report);
        }

        let proven = |reason: &TerminationReason| {
            workers
                .iter()
                .any(|w| &w.termination_reason == reason)
        };
        let status = if proven(&TerminationReason::OptimalityProven) && best.is_some() {
            SolveStatus::Optimal
        } else if proven(&TerminationReason::InfeasibilityProven) {
            SolveStatus::Infeasible
        } else if best.is_some() {
            SolveStatus::Feasible
        } else {
            SolveStatus::Timeout
        };

        let outcome = PortfolioOutcome {
            status,
            solution: best,
            workers,
            elapsed: start_time.elapsed(),
        };
        for worker in &outcome.workers {
            tracing::debug!(
                strategy = %worker.strategy,
                termination = %worker.termination_reason,
                nodes = worker.statistics.nodes_explored,
                solutions = worker.statistics.solutions_found,
                sequencing_limits = worker.statistics.sequencing_limit_hits,
                "worker statistics"
            );
        }
        outcome
    }
}

fn worker_report(strategy: Strategy, outcome: BnbOutcome) -> (WorkerReport, Option<BnbSolution>) {
    let (result, termination_reason, statistics) = outcome.into_parts();
    (
        WorkerReport {
            strategy,
            termination_reason,
            statistics,
        },
        result.into_solution(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SolverConfig,
        context::{CancelHandle, RunContext},
    };
    use chrono::{NaiveDate, Weekday};
    use seasonal_core::math::interval::ClosedOpenInterval;
    use seasonal_model::{
        id::{EventId, OccurrenceId, SpaceId},
        index::EventIndex,
        model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
        time::{Period, TickResolution},
    };

    type IntegerType = i64;

    fn iv(start: IntegerType, end: IntegerType) -> ClosedOpenInterval<IntegerType> {
        ClosedOpenInterval::new(start, end)
    }

    /// Four Monday events of 20, 20, 16 and 12 ticks competing for a 48 tick evening.
    fn crowded_monday() -> ConstraintModel {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
        )
        .unwrap();
        let mut b = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);
        let hall = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        for day in 0..14 {
            b.add_space_opening(hall, iv(day * 96 + 40, day * 96 + 88));
        }
        for (id, len) in [(1, 20), (2, 20), (3, 16), (4, 12)] {
            let e = b.add_event(EventSpec::new(EventId(id), format!("E{id}"), len));
            b.add_event_space(e, SpaceId(1));
            b.add_occurrence(
                e,
                OccurrenceSpec::new(OccurrenceId(id), Weekday::Mon, iv(40, 88)).with_days([0, 7]),
            );
        }
        let model = b.build().unwrap();
        let events: Vec<EventIndex> = EventIndex::range(model.num_events()).collect();
        ConstraintModel::build(&model, &events)
    }

    #[test]
    fn test_parallel_workers_agree_on_the_optimum() {
        let problem = crowded_monday();
        let ctx = RunContext::new(SolverConfig::default().with_worker_threads(3));
        let outcome = Portfolio::solve_once(&problem, &ctx);

        assert_eq!(outcome.status(), SolveStatus::Optimal);
        assert_eq!(outcome.solution().map(BnbSolution::objective), Some(48));
        assert_eq!(outcome.workers().len(), 3);
        assert!(outcome.solution().unwrap().is_consistent_with(&problem));
    }

    #[test]
    fn test_cancelled_run_times_out_without_solution() {
        let problem = crowded_monday();
        let cancel = CancelHandle::new();
        cancel.cancel();
        let ctx = RunContext::new(SolverConfig::default()).with_cancel_handle(cancel);
        let outcome = Portfolio::solve_once(&problem, &ctx);

        assert_eq!(outcome.status(), SolveStatus::Timeout);
        assert!(outcome.solution().is_none());
        assert!(matches!(
            outcome.workers()[0].termination_reason(),
            TerminationReason::Aborted(_)
        ));
    }

    #[test]
    fn test_expired_deadline_returns_the_first_dive() {
        let problem = crowded_monday();
        let ctx = RunContext::new(SolverConfig::default().with_worker_threads(3))
            .with_deadline(Some(Instant::now()));
        let outcome = Portfolio::solve_once(&problem, &ctx);

        assert_eq!(outcome.status(), SolveStatus::Feasible);
        let solution = outcome.solution().unwrap();
        assert!(solution.objective() > 0);
        assert!(solution.is_consistent_with(&problem));
    }

    #[test]
    fn test_portfolio_can_be_reused() {
        let problem = crowded_monday();
        let ctx = RunContext::new(SolverConfig::default().with_worker_threads(2));
        let mut portfolio = Portfolio::new(&ctx);
        let first = portfolio.solve(&problem);
        let second = portfolio.solve(&problem);
        assert_eq!(first.status(), SolveStatus::Optimal);
        assert_eq!(
            first.solution().map(BnbSolution::objective),
            second.solution().map(BnbSolution::objective)
        );
    }
}
