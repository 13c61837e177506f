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

//! Observers and stop conditions for the branch-and-bound search.
//!
//! - `tree_search_monitor`: the `TreeSearchMonitor` trait, `PruneReason` and
//!   `SearchCommand`.
//! - `composite`: fans events out to several monitors.
//! - `no_op`: ignores everything.
//! - `time_limit`: stops the search at a deadline.
//! - `interrupt`: stops the search when a shared flag is raised.
//! - `log`: periodic progress through `tracing`.

pub mod composite;
pub mod interrupt;
pub mod log;
pub mod no_op;
pub mod time_limit;
pub mod tree_search_monitor;
