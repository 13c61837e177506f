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

//! # Interval Lists
//!
//! Algebra over *normalized* interval lists: sorted by start, pairwise
//! disjoint, non-adjacent and free of empty intervals. Availability
//! calendars and start-time domains are kept in this form so that
//! intersection and subtraction are simple linear merges.
//!
//! ## Usage
//!
//! ```rust
//! use seasonal_core::math::interval::ClosedOpenInterval;
//! use seasonal_core::math::set;
//!
//! let open = set::normalize(vec![
//!     ClosedOpenInterval::new(600, 720),
//!     ClosedOpenInterval::new(480, 600),
//! ]);
//! assert_eq!(open, vec![ClosedOpenInterval::new(480, 720)]);
//!
//! let booked = [ClosedOpenInterval::new(540, 570)];
//! let left = set::subtract(&open, &booked);
//! assert_eq!(left, vec![ClosedOpenInterval::new(480, 540), ClosedOpenInterval::new(570, 720)]);
//! ```

use crate::math::interval::ClosedOpenInterval;
use num_traits::PrimInt;
use std::cmp::{max, min};

/// Sorts, merges overlapping or touching intervals and drops empty ones.
pub fn normalize<T>(mut intervals: Vec<ClosedOpenInterval<T>>) -> Vec<ClosedOpenInterval<T>>
where
    T: PrimInt,
{
    intervals.retain(|iv| !iv.is_empty());
    intervals.sort_unstable_by_key(|iv| (iv.start(), iv.end()));

    let mut merged: Vec<ClosedOpenInterval<T>> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start() <= last.end() => {
                *last = ClosedOpenInterval::new_unchecked(last.start(), max(last.end(), iv.end()));
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Returns `true` if the list is sorted, disjoint, non-adjacent and contains no empty interval.
pub fn is_normalized<T>(intervals: &[ClosedOpenInterval<T>]) -> bool
where
    T: PrimInt,
{
    intervals.iter().all(|iv| !iv.is_empty())
        && intervals.windows(2).all(|w| w[0].end() < w[1].start())
}

/// Intersects two normalized lists.
///
/// # Examples
///
/// ```rust
/// # use seasonal_core::math::interval::ClosedOpenInterval;
/// # use seasonal_core::math::set;
/// let a = [ClosedOpenInterval::new(0, 10), ClosedOpenInterval::new(20, 30)];
/// let b = [ClosedOpenInterval::new(5, 25)];
/// assert_eq!(
///     set::intersect(&a, &b),
///     vec![ClosedOpenInterval::new(5, 10), ClosedOpenInterval::new(20, 25)]
/// );
/// ```
pub fn intersect<T>(
    a: &[ClosedOpenInterval<T>],
    b: &[ClosedOpenInterval<T>],
) -> Vec<ClosedOpenInterval<T>>
where
    T: PrimInt,
{
    debug_assert!(is_normalized(a), "called `set::intersect` with an unnormalized left operand");
    debug_assert!(is_normalized(b), "called `set::intersect` with an unnormalized right operand");

    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let start = max(a[i].start(), b[j].start());
        let end = min(a[i].end(), b[j].end());
        if start < end {
            result.push(ClosedOpenInterval::new_unchecked(start, end));
        }
        if a[i].end() < b[j].end() {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}

/// Removes every point of `remove` from `base`. Both lists must be normalized.
pub fn subtract<T>(
    base: &[ClosedOpenInterval<T>],
    remove: &[ClosedOpenInterval<T>],
) -> Vec<ClosedOpenInterval<T>>
where
    T: PrimInt,
{
    debug_assert!(is_normalized(base), "called `set::subtract` with an unnormalized base");
    debug_assert!(is_normalized(remove), "called `set::subtract` with an unnormalized removal list");

    let mut result = Vec::with_capacity(base.len());
    let mut j = 0;
    for iv in base {
        let mut current = *iv;
        while j < remove.len() && remove[j].end() <= current.start() {
            j += 1;
        }
        let mut k = j;
        let mut exhausted = false;
        while k < remove.len() && remove[k].start() < current.end() {
            let cut = remove[k];
            if cut.start() > current.start() {
                result.push(ClosedOpenInterval::new_unchecked(current.start(), cut.start()));
            }
            if cut.end() >= current.end() {
                exhausted = true;
                break;
            }
            current = ClosedOpenInterval::new_unchecked(cut.end(), current.end());
            k += 1;
        }
        if !exhausted {
            result.push(current);
        }
    }
    result
}

/// Returns the smallest point `>= from` that lies in a normalized list.
///
/// # Examples
///
/// ```rust
/// # use seasonal_core::math::interval::ClosedOpenInterval;
/// # use seasonal_core::math::set;
/// let starts = [ClosedOpenInterval::new(0, 4), ClosedOpenInterval::new(10, 12)];
/// assert_eq!(set::first_point_at_or_after(&starts, 2), Some(2));
/// assert_eq!(set::first_point_at_or_after(&starts, 5), Some(10));
/// assert_eq!(set::first_point_at_or_after(&starts, 12), None);
/// ```
pub fn first_point_at_or_after<T>(intervals: &[ClosedOpenInterval<T>], from: T) -> Option<T>
where
    T: PrimInt,
{
    let pos = intervals.partition_point(|iv| iv.end() <= from);
    intervals.get(pos).map(|iv| max(iv.start(), from))
}

/// Returns the intervals of a normalized list clipped to `window`.
pub fn clip<T>(
    intervals: &[ClosedOpenInterval<T>],
    window: ClosedOpenInterval<T>,
) -> Vec<ClosedOpenInterval<T>>
where
    T: PrimInt,
{
    let first = intervals.partition_point(|iv| iv.end() <= window.start());
    intervals[first..]
        .iter()
        .take_while(|iv| iv.start() < window.end())
        .filter_map(|iv| iv.intersection(window))
        .collect()
}

/// Returns the total number of points covered by a normalized list.
pub fn total_len<T>(intervals: &[ClosedOpenInterval<T>]) -> T
where
    T: PrimInt,
{
    intervals.iter().fold(T::zero(), |acc, iv| acc + iv.len())
}
