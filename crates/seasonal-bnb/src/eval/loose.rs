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

/// `granted + Σ length` over all undecided nodes, ignoring weekly quotas.
///
/// Admissible but weak; useful as a baseline when comparing strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LooseBound;

impl LooseBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl BoundEvaluator for LooseBound {
    fn name(&self) -> &str {
        "LooseBound"
    }

    #[inline]
    fn upper_bound(&mut self, _problem: &ConstraintModel, state: &SearchState) -> Tick {
        state.granted() + state.remaining()
    }
}
