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
    branching::decision::DecisionBuilder,
    problem::{ConstraintModel, NodeIndex, VarIndex},
    state::SearchState,
};

/// Visits nodes and candidates exactly in the order the model lists them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOrderBuilder;

impl InputOrderBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl DecisionBuilder for InputOrderBuilder {
    fn name(&self) -> &str {
        "InputOrderBuilder"
    }

    fn node_order(&mut self, problem: &ConstraintModel) -> Vec<NodeIndex> {
        NodeIndex::range(problem.num_nodes()).collect()
    }

    fn order_assignments(
        &mut self,
        _problem: &ConstraintModel,
        _state: &SearchState,
        candidates: &mut [VarIndex],
    ) {
        candidates.sort_unstable();
    }
}
