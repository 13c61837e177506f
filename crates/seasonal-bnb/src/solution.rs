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

use crate::problem::{ConstraintModel, VarIndex};
use seasonal_model::time::Tick;

/// A selected variable with its resolved start tick of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    pub var: VarIndex,
    pub start: Tick,
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.var, self.start)
    }
}

/// A complete solution of a `ConstraintModel`.
///
/// Objective is the sum of the lengths of all selected variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BnbSolution {
    objective: Tick,
    assignments: Vec<Assignment>,
}

impl BnbSolution {
    /// Creates a solution; assignments are kept sorted by variable.
    pub fn new(objective: Tick, mut assignments: Vec<Assignment>) -> Self {
        assignments.sort_unstable();
        Self {
            objective,
            assignments,
        }
    }

    /// The empty solution: nothing granted.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn objective(&self) -> Tick {
        self.objective
    }

    #[inline]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[inline]
    pub fn num_assignments(&self) -> usize {
        self.assignments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Returns `true` if the objective equals the lengths of the selected variables.
    pub fn is_consistent_with(&self, problem: &ConstraintModel) -> bool {
        let total: Tick = self
            .assignments
            .iter()
            .map(|a| problem.var(a.var).length())
            .sum();
        total == self.objective
    }
}

impl std::fmt::Display for BnbSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolution(objective: {}, assignments: {})",
            self.objective,
            self.assignments.len()
        )
    }
}
