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

#![allow(dead_code)]

use crate::{branching::decision::Decision, problem::ConstraintModel, state::SearchState};

/// A log of the decisions applied on the current search path.
///
/// `apply` records a decision and applies it to the state; `backtrack`
/// reverts the most recent one. The trail depth always equals the number
/// of applied decisions.
#[derive(Clone, Debug, Default)]
pub struct SearchTrail {
    entries: Vec<Decision>,
}

impl SearchTrail {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_nodes),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_nodes: usize) {
        if self.entries.capacity() < num_nodes {
            self.entries.reserve(num_nodes - self.entries.len());
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The decisions on the current path, root first.
    #[inline]
    pub fn entries(&self) -> &[Decision] {
        &self.entries
    }

    /// Applies `decision` to `state` and records it.
    #[inline]
    pub fn apply(&mut self, problem: &ConstraintModel, state: &mut SearchState, decision: Decision) {
        state.apply(problem, decision);
        self.entries.push(decision);
    }

    /// Reverts the most recent decision, returning it.
    #[inline]
    pub fn backtrack(&mut self, problem: &ConstraintModel, state: &mut SearchState) -> Option<Decision> {
        let decision = self.entries.pop()?;
        state.undo(problem, decision);
        Some(decision)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<Decision>()
    }
}

impl std::fmt::Display for SearchTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchTrail(depth: {})", self.depth())
    }
}
