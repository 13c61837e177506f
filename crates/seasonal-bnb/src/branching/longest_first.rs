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

//! Longest-first branching.
//!
//! Deciding the longest occurrences first fills the objective quickly and
//! gives the bound something to prune against early. Among the spaces of
//! one occurrence, the one with the most budget left on its tightest date is
//! tried first, which tends to keep room for the occurrences still to come.

use crate::{
    branching::decision::DecisionBuilder,
    problem::{ConstraintModel, NodeIndex, VarIndex},
    state::SearchState,
};
use seasonal_model::time::Tick;
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LongestFirstBuilder;

impl LongestFirstBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

/// Budget left for `var` on the tightest of its dates.
fn remaining_budget(problem: &ConstraintModel, state: &SearchState, var: VarIndex) -> Tick {
    let v = problem.var(var);
    problem
        .node(v.node())
        .day_list()
        .iter()
        .map(|&day| problem.capacity(v.space(), day) - state.used_capacity(v.space(), day))
        .min()
        .unwrap_or(0)
}

impl DecisionBuilder for LongestFirstBuilder {
    fn name(&self) -> &str {
        "LongestFirstBuilder"
    }

    fn node_order(&mut self, problem: &ConstraintModel) -> Vec<NodeIndex> {
        let mut order: Vec<NodeIndex> = NodeIndex::range(problem.num_nodes()).collect();
        order.sort_by_key(|&n| (Reverse(problem.node(n).length()), n));
        order
    }

    fn order_assignments(
        &mut self,
        problem: &ConstraintModel,
        state: &SearchState,
        candidates: &mut [VarIndex],
    ) {
        candidates.sort_by_cached_key(|&v| (Reverse(remaining_budget(problem, state, v)), v));
    }
}
