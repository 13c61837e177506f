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

//! # Shared Incumbent
//!
//! The best solution found so far by any worker of a portfolio. The
//! objective is maximized; a lock-free `AtomicI64` mirrors the best
//! objective for cheap bound checks while the solution itself sits behind a
//! `Mutex`. The atomic starts at `i64::MIN`, meaning "nothing installed".

use crate::solution::BnbSolution;
use seasonal_model::time::Tick;
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicI64, Ordering},
};

#[derive(Debug)]
pub struct SharedIncumbent {
    best: AtomicI64,
    solution: Mutex<Option<BnbSolution>>,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedIncumbent {
    #[inline]
    pub fn new() -> Self {
        Self {
            best: AtomicI64::new(i64::MIN),
            solution: Mutex::new(None),
        }
    }

    /// The best installed objective, if any.
    #[inline]
    pub fn best_objective(&self) -> Option<Tick> {
        match self.best.load(Ordering::Relaxed) {
            i64::MIN => None,
            best => Some(best),
        }
    }

    /// A clone of the installed solution.
    pub fn snapshot(&self) -> Option<BnbSolution> {
        self.solution
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Takes the installed solution out, leaving the holder empty.
    pub fn take(&self) -> Option<BnbSolution> {
        let solution = self
            .solution
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.best.store(i64::MIN, Ordering::Relaxed);
        solution
    }

    /// Installs `candidate` if it is strictly better than the current incumbent.
    pub fn try_install(&self, candidate: &BnbSolution) -> bool {
        let objective = candidate.objective();
        if objective <= self.best.load(Ordering::Relaxed) {
            return false;
        }
        let mut guard = self.solution.lock().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the lock; another thread may have won the race.
        let current = guard.as_ref().map_or(i64::MIN, BnbSolution::objective);
        if objective <= current {
            return false;
        }
        *guard = Some(candidate.clone());
        self.best.store(objective, Ordering::Relaxed);
        true
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.best_objective() {
            Some(best) => write!(f, "Incumbent(best: {})", best),
            None => write!(f, "Incumbent(none)"),
        }
    }
}
