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

use seasonal_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for space indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SpaceIndexTag;

impl TypedIndexTag for SpaceIndexTag {
    const NAME: &'static str = "SpaceIndex";
}

/// A typed index into the space arena of an `AllocationModel`.
pub type SpaceIndex = TypedIndex<SpaceIndexTag>;

/// A tag type for event indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EventIndexTag;

impl TypedIndexTag for EventIndexTag {
    const NAME: &'static str = "EventIndex";
}

/// A typed index into the event arena of an `AllocationModel`.
pub type EventIndex = TypedIndex<EventIndexTag>;

/// A tag type for occurrence indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct OccurrenceIndexTag;

impl TypedIndexTag for OccurrenceIndexTag {
    const NAME: &'static str = "OccurrenceIndex";
}

/// A typed index into the occurrence arena of an `AllocationModel`.
pub type OccurrenceIndex = TypedIndex<OccurrenceIndexTag>;

/// A tag type for basket indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BasketIndexTag;

impl TypedIndexTag for BasketIndexTag {
    const NAME: &'static str = "BasketIndex";
}

/// A typed index into the basket arena of an `AllocationModel`.
pub type BasketIndex = TypedIndex<BasketIndexTag>;
