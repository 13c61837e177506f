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

//! Upper bounds for the branch-and-bound search.
//!
//! The objective is maximized, so an evaluator must never under-estimate
//! what a subtree can still reach. A bound that is too low cuts off optimal
//! solutions; a bound that is too high only costs search effort.
//!
//! Submodules:
//! - `evaluator`: the `BoundEvaluator` trait.
//! - `quota`: granted ticks plus what the remaining quotas can still absorb.
//! - `capacity`: the quota bound, further capped by the remaining daily budgets.
//! - `loose`: granted ticks plus every undecided node, ignoring quotas.

pub mod capacity;
pub mod evaluator;
pub mod loose;
pub mod quota;
