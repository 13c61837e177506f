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

//! # Seasonal Model
//!
//! **The domain model of the seasonal allocation engine.**
//!
//! A round of recurring booking requests is described as spaces with
//! opening calendars, events asking for weekly slots, and baskets that
//! rank events into priority tiers. This crate turns that description into
//! an immutable, validated `AllocationModel` that the search engine
//! (`seasonal_bnb`) works on, and defines the `AllocatedEvent` records that
//! come back out.
//!
//! ## Architecture
//!
//! * **`index`** / **`id`**: Dense arena indices (`SpaceIndex`, `EventIndex`, ...) and the
//!   external identifiers of the booking system (`SpaceId`, `EventId`, ...).
//! * **`time`**: Tick resolution and the calendar period.
//! * **`model`**: `AllocationModel` and its validating `ModelBuilder`.
//! * **`snapshot`**: Serializable round records and the `SnapshotBuilder`
//!   that expands them into a model.
//! * **`solution`**: The `AllocatedEvent` output record.
//! * **`validation`**: An independent checker for finished allocations.
//!
//! ## Design Philosophy
//!
//! 1. **Arenas, not pointers**: entities reference each other by typed index only.
//! 2. **Fail-Fast**: every structural problem is a `ModelError` at build time.
//! 3. **Immutable snapshots**: capacity consumed by a tier produces a new
//!    model (`AllocationModel::with_consumed`), the old one stays untouched.

pub mod basket;
pub mod err;
pub mod event;
pub mod id;
pub mod index;
pub mod model;
pub mod snapshot;
pub mod solution;
pub mod space;
pub mod time;
pub mod validation;
