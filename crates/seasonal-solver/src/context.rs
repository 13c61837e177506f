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

use crate::config::SolverConfig;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// A cloneable handle that cancels a running allocation.
///
/// Cancelling is cooperative: searches notice the flag at their next step
/// and return the best solution found so far.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn flag(&self) -> &AtomicBool {
        &self.flag
    }
}

/// The explicit parameters of one allocation run.
#[derive(Clone, Debug)]
pub struct RunContext {
    config: SolverConfig,
    deadline: Option<Instant>,
    cancel: CancelHandle,
    label: String,
}

impl RunContext {
    /// Creates a context whose deadline is the configured time limit from now.
    pub fn new(config: SolverConfig) -> Self {
        let deadline = config
            .time_limit()
            .and_then(|limit| Instant::now().checked_add(limit));
        Self {
            config,
            deadline,
            cancel: CancelHandle::new(),
            label: String::from("allocation"),
        }
    }

    #[inline]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    #[inline]
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    #[inline]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[inline]
    pub fn cancel_handle(&self) -> &CancelHandle {
        &self.cancel
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Time left until the deadline; `None` without a deadline.
    #[inline]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// A child context for one of `parts` remaining stages: it keeps the
    /// cancel handle and gets an equal share of the time left.
    ///
    /// Time a stage does not use rolls over to the next share.
    pub fn share(&self, parts: usize) -> Self {
        let parts = u32::try_from(parts.max(1)).unwrap_or(u32::MAX);
        let deadline = self.remaining().map(|left| Instant::now() + left / parts);
        Self {
            config: self.config.clone(),
            deadline,
            cancel: self.cancel.clone(),
            label: self.label.clone(),
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }
}

impl std::fmt::Display for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RunContext(label: {}, remaining: {:?}, cancelled: {})",
            self.label,
            self.remaining(),
            self.cancel.is_cancelled()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_follows_time_limit() {
        let ctx = RunContext::new(SolverConfig::default().with_time_limit(None));
        assert_eq!(ctx.deadline(), None);
        assert_eq!(ctx.remaining(), None);
        assert!(!ctx.is_expired());

        let ctx = RunContext::new(SolverConfig::default())
            .with_deadline(Some(Instant::now()));
        assert!(ctx.is_expired());
    }

    #[test]
    fn test_share_splits_the_time_left() {
        let config = SolverConfig::default().with_time_limit(Some(Duration::from_secs(40)));
        let ctx = RunContext::new(config);
        let first = ctx.share(4);
        let left = first.remaining().unwrap();
        assert!(left <= Duration::from_secs(10));
        assert!(left > Duration::from_secs(9));
        assert!(first.deadline() <= ctx.deadline());

        let last = ctx.share(1);
        assert!(last.remaining().unwrap() > Duration::from_secs(39));

        let unlimited = RunContext::new(SolverConfig::default().with_time_limit(None)).share(3);
        assert_eq!(unlimited.deadline(), None);
    }

    #[test]
    fn test_share_keeps_the_cancel_handle() {
        let handle = CancelHandle::new();
        let ctx = RunContext::new(SolverConfig::default()).with_cancel_handle(handle.clone());
        let tier = ctx.share(2);
        handle.cancel();
        assert!(tier.cancel_handle().is_cancelled());
    }

    #[test]
    fn test_cancel_handle_is_shared() {
        let handle = CancelHandle::new();
        let ctx = RunContext::new(SolverConfig::default()).with_cancel_handle(handle.clone());
        assert!(!ctx.cancel_handle().is_cancelled());
        handle.cancel();
        assert!(ctx.cancel_handle().is_cancelled());
    }
}
