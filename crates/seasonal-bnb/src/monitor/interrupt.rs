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
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbStatistics,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Terminates the search when a shared flag is raised.
///
/// Portfolio workers share one flag so that the first worker to prove
/// optimality can stop the others.
#[derive(Debug, Clone, Copy)]
pub struct InterruptMonitor<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InterruptMonitor<'a> {
    #[inline]
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }
}

impl TreeSearchMonitor for InterruptMonitor<'_> {
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    #[inline]
    fn search_command(&mut self, _state: &SearchState, _statistics: &BnbStatistics) -> SearchCommand {
        if self.flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("interrupted".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}
