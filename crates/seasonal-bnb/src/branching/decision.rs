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

//! Branching decisions and the `DecisionBuilder` trait.
//!
//! Every search level belongs to one occurrence node. A level offers one
//! `Decision::Assign` per candidate variable of that node that passes the
//! quota and capacity checks, followed by a single `Decision::Skip`. The
//! builder decides the order in which nodes are visited and the order in
//! which the assignments of a level are explored; skipping is always
//! explored last.

use crate::{
    problem::{ConstraintModel, NodeIndex, VarIndex},
    state::SearchState,
};

/// A branching decision on one occurrence node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Decision {
    /// Grant the occurrence through the given variable.
    Assign { node: NodeIndex, var: VarIndex },
    /// Leave the occurrence unallocated.
    Skip { node: NodeIndex },
}

impl Decision {
    #[inline]
    pub fn node(&self) -> NodeIndex {
        match *self {
            Decision::Assign { node, .. } | Decision::Skip { node } => node,
        }
    }

    #[inline]
    pub fn var(&self) -> Option<VarIndex> {
        match *self {
            Decision::Assign { var, .. } => Some(var),
            Decision::Skip { .. } => None,
        }
    }

    #[inline]
    pub fn is_skip(&self) -> bool {
        matches!(self, Decision::Skip { .. })
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Assign { node, var } => write!(f, "Decision(assign {} -> {})", node, var),
            Decision::Skip { node } => write!(f, "Decision(skip {})", node),
        }
    }
}

/// Controls the shape of the search tree.
pub trait DecisionBuilder {
    /// Returns the name of the builder.
    fn name(&self) -> &str;

    /// The order in which occurrence nodes are decided, one node per level.
    ///
    /// Must be a permutation of all node indices of `problem`.
    fn node_order(&mut self, problem: &ConstraintModel) -> Vec<NodeIndex>;

    /// Sorts the admissible variables of one level, most promising first.
    fn order_assignments(
        &mut self,
        problem: &ConstraintModel,
        state: &SearchState,
        candidates: &mut [VarIndex],
    );
}

impl std::fmt::Debug for dyn DecisionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecisionBuilder({})", self.name())
    }
}

impl std::fmt::Display for dyn DecisionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecisionBuilder({})", self.name())
    }
}

impl<B> DecisionBuilder for Box<B>
where
    B: DecisionBuilder + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn node_order(&mut self, problem: &ConstraintModel) -> Vec<NodeIndex> {
        (**self).node_order(problem)
    }

    fn order_assignments(
        &mut self,
        problem: &ConstraintModel,
        state: &SearchState,
        candidates: &mut [VarIndex],
    ) {
        (**self).order_assignments(problem, state, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_accessors() {
        let assign = Decision::Assign {
            node: NodeIndex::new(2),
            var: VarIndex::new(5),
        };
        let skip = Decision::Skip {
            node: NodeIndex::new(2),
        };
        assert_eq!(assign.node(), NodeIndex::new(2));
        assert_eq!(assign.var(), Some(VarIndex::new(5)));
        assert!(!assign.is_skip());
        assert_eq!(skip.var(), None);
        assert!(skip.is_skip());
        assert_eq!(
            format!("{}", assign),
            "Decision(assign NodeIndex(2) -> VarIndex(5))"
        );
        assert_eq!(format!("{}", skip), "Decision(skip NodeIndex(2))");
    }
}
