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

use num_traits::PrimInt;
use smallvec::SmallVec;
use std::cmp::{max, min};

/// A half-open interval `[start, end)` over a primitive integer type.
///
/// Opening hours, requested windows and booked slots are all expressed as
/// closed-open intervals of ticks, so two back-to-back bookings share an
/// endpoint without overlapping.
///
/// # Invariants
///
/// `start_inclusive <= end_exclusive` always holds. Empty intervals
/// (`start == end`) are representable but never intersect anything.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedOpenInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_core::math::interval::ClosedOpenInterval;
    /// let iv = ClosedOpenInterval::new(0, 10);
    /// assert_eq!(iv.len(), 10);
    /// ```
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates a new `ClosedOpenInterval`, returning `None` if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_core::math::interval::ClosedOpenInterval;
    /// assert!(ClosedOpenInterval::try_new(0, 10).is_some());
    /// assert!(ClosedOpenInterval::try_new(10, 0).is_none());
    /// ```
    #[inline]
    pub fn try_new(start_inclusive: T, end_exclusive: T) -> Option<Self> {
        (start_inclusive <= end_exclusive).then_some(Self {
            start_inclusive,
            end_exclusive,
        })
    }

    /// Creates a new `ClosedOpenInterval` checking the invariant only in debug builds.
    #[inline]
    pub fn new_unchecked(start_inclusive: T, end_exclusive: T) -> Self {
        debug_assert!(
            start_inclusive <= end_exclusive,
            "called `ClosedOpenInterval::new_unchecked` with start {:?} after end {:?}",
            start_inclusive.to_i64(),
            end_exclusive.to_i64()
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Returns the inclusive start bound.
    #[inline]
    pub const fn start(&self) -> T {
        self.start_inclusive
    }

    /// Returns the exclusive end bound.
    #[inline]
    pub const fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns the number of integer points in the interval.
    #[inline]
    pub fn len(&self) -> T {
        self.end_exclusive - self.start_inclusive
    }

    /// Returns `true` if the interval contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    /// Returns `true` if both intervals share at least one point.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_core::math::interval::ClosedOpenInterval;
    /// let a = ClosedOpenInterval::new(0, 10);
    /// assert!(a.intersects(ClosedOpenInterval::new(9, 12)));
    /// assert!(!a.intersects(ClosedOpenInterval::new(10, 12)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    /// Returns `true` if `value` lies within `[start, end)`.
    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.start_inclusive <= value && value < self.end_exclusive
    }

    /// Returns `true` if `other` lies completely inside `self`.
    ///
    /// An empty `other` is contained in every interval.
    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        other.is_empty()
            || (self.start_inclusive <= other.start_inclusive
                && other.end_exclusive <= self.end_exclusive)
    }

    /// Returns the common part of both intervals, or `None` if they do not intersect.
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let start = max(self.start_inclusive, other.start_inclusive);
        let end = min(self.end_exclusive, other.end_exclusive);
        (start < end).then(|| Self::new_unchecked(start, end))
    }

    /// Calculates the set difference `self - other`.
    ///
    /// Yields zero, one or two pieces depending on how `other` cuts `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_core::math::interval::ClosedOpenInterval;
    /// let day = ClosedOpenInterval::new(0, 10);
    /// let pieces = day.difference(ClosedOpenInterval::new(4, 6));
    /// assert_eq!(pieces.as_slice(), &[ClosedOpenInterval::new(0, 4), ClosedOpenInterval::new(6, 10)]);
    /// ```
    pub fn difference(&self, other: Self) -> SmallVec<Self, 2> {
        if other.is_empty() || !self.intersects(other) {
            return smallvec::smallvec![*self];
        }

        let mut result = SmallVec::new();
        if self.start_inclusive < other.start_inclusive {
            result.push(Self::new_unchecked(
                self.start_inclusive,
                other.start_inclusive,
            ));
        }
        if self.end_exclusive > other.end_exclusive {
            result.push(Self::new_unchecked(other.end_exclusive, self.end_exclusive));
        }
        result
    }

    /// Returns the interval moved by `offset` ticks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_core::math::interval::ClosedOpenInterval;
    /// let iv = ClosedOpenInterval::new(10, 20);
    /// assert_eq!(iv.shift(-10), ClosedOpenInterval::new(0, 10));
    /// ```
    #[inline]
    pub fn shift(&self, offset: T) -> Self {
        Self::new_unchecked(self.start_inclusive + offset, self.end_exclusive + offset)
    }

    /// Returns the start ticks at which a block of `length` fits completely inside the interval.
    ///
    /// The result is itself an interval of start points, `[start, end - length + 1)`,
    /// or `None` if the interval is shorter than `length`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_core::math::interval::ClosedOpenInterval;
    /// let window = ClosedOpenInterval::new(8, 12);
    /// assert_eq!(window.starts_fitting(3), Some(ClosedOpenInterval::new(8, 10)));
    /// assert_eq!(window.starts_fitting(5), None);
    /// ```
    #[inline]
    pub fn starts_fitting(&self, length: T) -> Option<Self> {
        if length <= T::zero() || self.len() < length {
            return None;
        }
        Some(Self::new_unchecked(
            self.start_inclusive,
            self.end_exclusive - length + T::one(),
        ))
    }
}

impl<T> Default for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn default() -> Self {
        Self::new_unchecked(T::zero(), T::zero())
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> From<std::ops::Range<T>> for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<ClosedOpenInterval<T>> for std::ops::Range<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(interval: ClosedOpenInterval<T>) -> Self {
        interval.start_inclusive..interval.end_exclusive
    }
}
