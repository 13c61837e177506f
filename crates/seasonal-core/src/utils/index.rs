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

//! # Strongly Typed Indices
//!
//! Phantom-typed wrappers around `usize` so that an index into the space
//! arena can never be used to address the event arena by accident.
//! `TypedIndex<T>` carries a tag type `T: TypedIndexTag` and compiles down to
//! a transparent `usize`.
//!
//! ## Usage
//!
//! ```rust
//! use seasonal_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
//! struct SpaceTag;
//! impl TypedIndexTag for SpaceTag { const NAME: &'static str = "SpaceIndex"; }
//!
//! type SpaceIndex = TypedIndex<SpaceTag>;
//! let s = SpaceIndex::new(3);
//! assert_eq!(s.get(), 3);
//! assert_eq!(format!("{}", s), "SpaceIndex(3)");
//! ```

/// A trait to tag typed indices with a name for debugging and display purposes.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A strongly typed index associated with the tag type `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new `TypedIndex` wrapping `index`.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize` index.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Returns an iterator over all indices `0..len` of an arena with `len` entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_core::utils::index::{TypedIndex, TypedIndexTag};
    /// # #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    /// # struct Tag;
    /// # impl TypedIndexTag for Tag { const NAME: &'static str = "Idx"; }
    /// let all: Vec<usize> = TypedIndex::<Tag>::range(3).map(|i| i.get()).collect();
    /// assert_eq!(all, vec![0, 1, 2]);
    /// ```
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline]
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct TestTag;

    impl TypedIndexTag for TestTag {
        const NAME: &'static str = "TestIdx";
    }

    type TestIndex = TypedIndex<TestTag>;

    #[test]
    fn test_new_and_get() {
        let idx = TestIndex::new(10);
        assert_eq!(idx.get(), 10);
    }

    #[test]
    fn test_conversions() {
        let idx: TestIndex = 42.into();
        assert_eq!(idx.get(), 42);

        let val: usize = idx.into();
        assert_eq!(val, 42);
    }

    #[test]
    fn test_debug_and_display() {
        let idx = TestIndex::new(7);
        assert_eq!(format!("{}", idx), "TestIdx(7)");
        assert_eq!(format!("{:?}", idx), "TestIdx(7)");
    }

    #[test]
    fn test_range_is_dense_and_ordered() {
        let indices: Vec<TestIndex> = TestIndex::range(4).collect();
        assert_eq!(indices.len(), 4);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(indices.last().map(TestIndex::get), Some(3));
        assert_eq!(TestIndex::range(0).count(), 0);
    }
}
