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

use crate::branching::decision::Decision;

/// A frame-structured LIFO stack of pending decisions.
///
/// Decisions of all open levels are stored linearly; `frames[i]` is the
/// index in `entries` where level `i` begins. Popping a frame truncates the
/// entries back to that index.
#[derive(Clone, Debug, Default)]
pub struct SearchStack {
    entries: Vec<Decision>,
    frames: Vec<usize>,
}

impl SearchStack {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a stack sized for a problem with `num_nodes` levels and `num_vars` variables.
    #[inline]
    pub fn preallocated(num_nodes: usize, num_vars: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_vars.saturating_add(num_nodes)),
            frames: Vec::with_capacity(num_nodes.saturating_add(1)),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_nodes: usize, num_vars: usize) {
        let entry_capacity = num_vars.saturating_add(num_nodes);
        let frame_capacity = num_nodes.saturating_add(1);
        if self.entries.capacity() < entry_capacity {
            self.entries.reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.len());
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// The number of open levels.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    #[inline]
    pub fn push(&mut self, decision: Decision) {
        self.entries.push(decision);
    }

    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Decision>,
    {
        self.entries.extend(iter);
    }

    /// Pops the next decision of the current level.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision> {
        let start = self.frames.last().copied()?;
        if self.entries.len() > start {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Returns `true` if the current level has no pending decisions left.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() <= start,
            None => true,
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<Decision>()
            + self.frames.capacity() * std::mem::size_of::<usize>()
    }
}

impl std::fmt::Display for SearchStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, depth: {})",
            self.num_entries(),
            self.depth()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{NodeIndex, VarIndex};

    fn assign(node: usize, var: usize) -> Decision {
        Decision::Assign {
            node: NodeIndex::new(node),
            var: VarIndex::new(var),
        }
    }

    #[test]
    fn test_frames_isolate_levels() {
        let mut stack = SearchStack::preallocated(4, 8);
        stack.push_frame();
        stack.extend([assign(0, 0), assign(0, 1)]);
        stack.push_frame();
        stack.push(assign(1, 2));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(assign(1, 2)));
        assert!(stack.is_current_level_empty());
        assert_eq!(stack.pop(), None);

        assert_eq!(stack.pop_frame(), Some(()));
        assert!(!stack.is_current_level_empty());
        assert_eq!(stack.pop(), Some(assign(0, 1)));
        assert_eq!(stack.num_entries(), 1);
    }

    #[test]
    fn test_pop_frame_truncates_pending_entries() {
        let mut stack = SearchStack::new();
        stack.push_frame();
        stack.push(assign(0, 0));
        stack.push_frame();
        stack.extend([assign(1, 1), assign(1, 2)]);
        stack.pop_frame();
        assert_eq!(stack.num_entries(), 1);
        stack.pop_frame();
        assert!(stack.is_empty());
        assert_eq!(stack.pop_frame(), None);
        assert!(stack.is_current_level_empty());
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut stack = SearchStack::preallocated(4, 8);
        let before = stack.allocated_memory_bytes();
        stack.push_frame();
        stack.push(assign(0, 0));
        stack.reset();
        assert_eq!(stack.num_entries(), 0);
        assert_eq!(stack.depth(), 0);
        assert!(stack.allocated_memory_bytes() >= before);
    }
}
