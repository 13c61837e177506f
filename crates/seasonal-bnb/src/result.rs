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

use crate::{solution::BnbSolution, stats::BnbStatistics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// We have proven that no assignment exists.
    Infeasible,
    /// We have found a solution and proven its optimality.
    Optimal(BnbSolution),
    /// We have found a solution, but not proven its optimality.
    Feasible(BnbSolution),
    /// The solver terminated without a solution of its own.
    Unknown,
}

impl SolverResult {
    /// The solution, if the result carries one.
    #[inline]
    pub fn solution(&self) -> Option<&BnbSolution> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn into_solution(self) -> Option<BnbSolution> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(solution) => {
                write!(f, "Optimal(objective={})", solution.objective())
            }
            SolverResult::Feasible(solution) => {
                write!(f, "Feasible(objective={})", solution.objective())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search tree was exhausted.
    OptimalityProven,
    /// The problem has no solution.
    InfeasibilityProven,
    /// A monitor stopped the search (time limit, interrupt).
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of one branch-and-bound run.
#[derive(Debug, Clone)]
pub struct BnbOutcome {
    result: SolverResult,
    termination_reason: TerminationReason,
    statistics: BnbStatistics,
}

impl BnbOutcome {
    #[inline]
    pub fn new(
        result: SolverResult,
        termination_reason: TerminationReason,
        statistics: BnbStatistics,
    ) -> Self {
        Self {
            result,
            termination_reason,
            statistics,
        }
    }

    #[inline]
    pub fn optimal(solution: BnbSolution, statistics: BnbStatistics) -> Self {
        Self::new(
            SolverResult::Optimal(solution),
            TerminationReason::OptimalityProven,
            statistics,
        )
    }

    #[inline]
    pub fn aborted<R>(solution: Option<BnbSolution>, reason: R, statistics: BnbStatistics) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(solution) => SolverResult::Feasible(solution),
            None => SolverResult::Unknown,
        };
        Self::new(result, TerminationReason::Aborted(reason.into()), statistics)
    }

    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_parts(self) -> (SolverResult, TerminationReason, BnbStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl std::fmt::Display for BnbOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbOutcome(result: {}, reason: {})",
            self.result, self.termination_reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_without_solution_is_unknown() {
        let outcome = BnbOutcome::aborted(None, "time limit", BnbStatistics::default());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        match outcome.termination_reason() {
            TerminationReason::Aborted(msg) => assert_eq!(msg, "time limit"),
            other => panic!("expected Aborted, got {}", other),
        }
    }

    #[test]
    fn test_aborted_with_solution_is_feasible() {
        let solution = BnbSolution::new(4, Vec::new());
        let outcome = BnbOutcome::aborted(Some(solution.clone()), "interrupt", BnbStatistics::default());
        assert_eq!(outcome.result().solution(), Some(&solution));
        assert!(!outcome.result().is_optimal());
        assert_eq!(format!("{}", outcome.result()), "Feasible(objective=4)");
    }
}
