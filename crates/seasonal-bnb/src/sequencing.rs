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

//! # No-Overlap Sequencing
//!
//! Decides whether a set of fixed-length blocks sharing one space and
//! weekday can all be placed at once, and if so where.
//!
//! Each item has a start domain (ticks of day) and the period days it
//! recurs on. Two items only conflict when their day sets intersect; items
//! on disjoint dates may use the same time of day.
//!
//! ## Algorithm
//!
//! A depth-first search over placement orders. The next item in the order
//! is placed at its *earliest* start that lies in its domain and does not
//! overlap an already placed conflicting item. Any feasible schedule can be
//! shifted left into one produced this way, so exploring all orders is
//! complete. In practice the search is tiny:
//!
//! - candidates with the earliest latest start are tried first,
//! - a branch is cut as soon as some unplaced item has no start left,
//! - interchangeable items (same length, domain and days) are tried once
//!   per level.
//!
//! A node limit bounds the work on adversarial inputs; hitting it yields
//! `SequencingOutcome::LimitReached`.

use fixedbitset::FixedBitSet;
use seasonal_core::math::{interval::ClosedOpenInterval, set};
use seasonal_model::time::Tick;

/// One block to place.
#[derive(Clone, Copy, Debug)]
pub struct SequencingItem<'a> {
    pub length: Tick,
    pub domain: &'a [ClosedOpenInterval<Tick>],
    pub days: &'a FixedBitSet,
}

impl<'a> SequencingItem<'a> {
    #[inline]
    pub fn new(length: Tick, domain: &'a [ClosedOpenInterval<Tick>], days: &'a FixedBitSet) -> Self {
        Self {
            length,
            domain,
            days,
        }
    }

    #[inline]
    fn conflicts_with(&self, other: &SequencingItem<'_>) -> bool {
        !self.days.is_disjoint(other.days)
    }

    #[inline]
    fn latest_start(&self) -> Tick {
        self.domain.last().map_or(Tick::MIN, |iv| iv.end() - 1)
    }

    #[inline]
    fn is_interchangeable_with(&self, other: &SequencingItem<'_>) -> bool {
        self.length == other.length && self.domain == other.domain && self.days == other.days
    }
}

/// The result of a sequencing attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequencingOutcome {
    /// A start per item, in input order.
    Feasible(Vec<Tick>),
    Infeasible,
    LimitReached,
}

impl SequencingOutcome {
    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, SequencingOutcome::Feasible(_))
    }
}

impl std::fmt::Display for SequencingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequencingOutcome::Feasible(starts) => write!(f, "Feasible({} items)", starts.len()),
            SequencingOutcome::Infeasible => write!(f, "Infeasible"),
            SequencingOutcome::LimitReached => write!(f, "LimitReached"),
        }
    }
}

/// Exact no-overlap feasibility check with a bounded search effort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoOverlapSequencer {
    node_limit: u64,
}

impl Default for NoOverlapSequencer {
    fn default() -> Self {
        Self::new()
    }
}

struct SequencingRun<'s, 'a> {
    items: &'s [SequencingItem<'a>],
    starts: Vec<Option<Tick>>,
    nodes: u64,
    node_limit: u64,
}

enum Step {
    Found,
    Exhausted,
    Limit,
}

impl SequencingRun<'_, '_> {
    /// Earliest start of `item` that avoids every placed conflicting item.
    fn earliest_start(&self, item: usize) -> Option<Tick> {
        let current = &self.items[item];
        let mut t = current.domain.first()?.start();
        loop {
            t = set::first_point_at_or_after(current.domain, t)?;
            let end = t + current.length;
            let blocking = self
                .items
                .iter()
                .zip(&self.starts)
                .enumerate()
                .filter(|&(other, _)| other != item)
                .filter_map(|(_, (placed, start))| start.map(|s| (placed, s)))
                .filter(|(placed, s)| *s < end && t < s + placed.length)
                .filter(|(placed, _)| current.conflicts_with(placed))
                .map(|(placed, s)| s + placed.length)
                .max();
            match blocking {
                Some(next) => t = next,
                None => return Some(t),
            }
        }
    }

    fn search(&mut self, order: &[usize]) -> Step {
        if order.iter().all(|&i| self.starts[i].is_some()) {
            return Step::Found;
        }
        self.nodes += 1;
        if self.nodes > self.node_limit {
            return Step::Limit;
        }

        let mut tried: Vec<usize> = Vec::new();
        for &candidate in order {
            if self.starts[candidate].is_some() {
                continue;
            }
            if tried
                .iter()
                .any(|&t| self.items[t].is_interchangeable_with(&self.items[candidate]))
            {
                continue;
            }
            tried.push(candidate);

            let Some(start) = self.earliest_start(candidate) else {
                // An unplaceable item stays unplaceable deeper down.
                return Step::Exhausted;
            };
            self.starts[candidate] = Some(start);

            let dead_end = order
                .iter()
                .any(|&i| self.starts[i].is_none() && self.earliest_start(i).is_none());
            if !dead_end {
                match self.search(order) {
                    Step::Found => return Step::Found,
                    Step::Limit => return Step::Limit,
                    Step::Exhausted => {}
                }
            }
            self.starts[candidate] = None;
        }
        Step::Exhausted
    }
}

impl NoOverlapSequencer {
    pub const DEFAULT_NODE_LIMIT: u64 = 4096;

    #[inline]
    pub fn new() -> Self {
        Self {
            node_limit: Self::DEFAULT_NODE_LIMIT,
        }
    }

    #[inline]
    pub fn with_node_limit(node_limit: u64) -> Self {
        Self { node_limit }
    }

    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }

    /// Tries to place every item without overlap.
    pub fn sequence(&self, items: &[SequencingItem<'_>]) -> SequencingOutcome {
        if items.iter().any(|item| item.domain.is_empty()) {
            return SequencingOutcome::Infeasible;
        }

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by_key(|&i| (items[i].latest_start(), items[i].length));

        let mut run = SequencingRun {
            items,
            starts: vec![None; items.len()],
            nodes: 0,
            node_limit: self.node_limit,
        };
        match run.search(&order) {
            Step::Found => SequencingOutcome::Feasible(run.starts.into_iter().flatten().collect()),
            Step::Exhausted => SequencingOutcome::Infeasible,
            Step::Limit => SequencingOutcome::LimitReached,
        }
    }
}

/// Returns `true` if no two conflicting items overlap at `starts` and every start lies in its domain.
pub fn is_valid_sequence(items: &[SequencingItem<'_>], starts: &[Tick]) -> bool {
    if items.len() != starts.len() {
        return false;
    }
    let in_domain = items.iter().zip(starts).all(|(item, &start)| {
        set::first_point_at_or_after(item.domain, start) == Some(start)
    });
    if !in_domain {
        return false;
    }
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            if !items[i].conflicts_with(&items[j]) {
                continue;
            }
            let a = ClosedOpenInterval::new(starts[i], starts[i] + items[i].length);
            let b = ClosedOpenInterval::new(starts[j], starts[j] + items[j].length);
            if a.intersects(b) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: Tick, end: Tick) -> ClosedOpenInterval<Tick> {
        ClosedOpenInterval::new(start, end)
    }

    fn days(num_days: usize, list: &[usize]) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(num_days);
        for &d in list {
            set.insert(d);
        }
        set
    }

    #[test]
    fn test_sequences_back_to_back_blocks() {
        let domain = [iv(0, 9)];
        let all = days(14, &[0, 7]);
        let items = [
            SequencingItem::new(4, &domain, &all),
            SequencingItem::new(4, &domain, &all),
            SequencingItem::new(4, &domain, &all),
        ];
        let outcome = NoOverlapSequencer::new().sequence(&items);
        match outcome {
            SequencingOutcome::Feasible(starts) => {
                assert!(is_valid_sequence(&items, &starts));
                let mut sorted = starts.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, vec![0, 4, 8]);
            }
            other => panic!("expected a feasible sequence, got {other}"),
        }
    }

    #[test]
    fn test_detects_overfull_window() {
        let domain = [iv(0, 3)];
        let all = days(14, &[0, 7]);
        let items = [
            SequencingItem::new(4, &domain, &all),
            SequencingItem::new(4, &domain, &all),
        ];
        assert_eq!(
            NoOverlapSequencer::new().sequence(&items),
            SequencingOutcome::Infeasible
        );
    }

    #[test]
    fn test_disjoint_dates_share_the_slot() {
        let domain = [iv(0, 1)];
        let first = days(14, &[0]);
        let second = days(14, &[7]);
        let items = [
            SequencingItem::new(8, &domain, &first),
            SequencingItem::new(8, &domain, &second),
        ];
        assert_eq!(
            NoOverlapSequencer::new().sequence(&items),
            SequencingOutcome::Feasible(vec![0, 0])
        );
    }

    #[test]
    fn test_order_matters_for_tight_domains() {
        // The long block only fits at 0, so the short one has to go after it
        // even though it could start earlier.
        let all = days(7, &[0]);
        let long_domain = [iv(0, 1)];
        let short_domain = [iv(0, 7)];
        let items = [
            SequencingItem::new(2, &short_domain, &all),
            SequencingItem::new(6, &long_domain, &all),
        ];
        assert_eq!(
            NoOverlapSequencer::new().sequence(&items),
            SequencingOutcome::Feasible(vec![6, 0])
        );
    }

    #[test]
    fn test_start_skips_domain_gaps() {
        let all = days(7, &[0]);
        let first = [iv(0, 1)];
        let gapped = [iv(0, 2), iv(10, 12)];
        let items = [
            SequencingItem::new(4, &first, &all),
            SequencingItem::new(4, &gapped, &all),
        ];
        assert_eq!(
            NoOverlapSequencer::new().sequence(&items),
            SequencingOutcome::Feasible(vec![0, 10])
        );
    }

    #[test]
    fn test_empty_domain_is_infeasible() {
        let all = days(7, &[0]);
        let items = [SequencingItem::new(4, &[], &all)];
        assert_eq!(
            NoOverlapSequencer::new().sequence(&items),
            SequencingOutcome::Infeasible
        );
    }

    #[test]
    fn test_node_limit_is_reported() {
        // Seven blocks of four in a window that holds six of them.
        let domain = [iv(0, 21)];
        let mut distinct_days: Vec<FixedBitSet> = Vec::new();
        for extra in 1..=7 {
            distinct_days.push(days(8, &[0, extra]));
        }
        let items: Vec<SequencingItem<'_>> = distinct_days
            .iter()
            .map(|d| SequencingItem::new(4, &domain, d))
            .collect();
        assert_eq!(
            NoOverlapSequencer::with_node_limit(3).sequence(&items),
            SequencingOutcome::LimitReached
        );
    }

    #[test]
    fn test_validity_check_rejects_overlap() {
        let domain = [iv(0, 10)];
        let all = days(7, &[0]);
        let items = [
            SequencingItem::new(4, &domain, &all),
            SequencingItem::new(4, &domain, &all),
        ];
        assert!(is_valid_sequence(&items, &[0, 4]));
        assert!(!is_valid_sequence(&items, &[0, 3]));
        assert!(!is_valid_sequence(&items, &[0, 10]));
    }
}
