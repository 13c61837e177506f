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

use crate::id::{BasketId, EventId, OccurrenceId, SpaceId};
use chrono::{NaiveDate, NaiveTime, Weekday};

/// Errors raised while assembling an `AllocationModel`.
///
/// Every variant is detected before a model is handed out, so the search
/// engine never sees inconsistent input. Entities are reported by their
/// external identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("tick resolution of {minutes} minutes does not divide a day")]
    InvalidResolution { minutes: u32 },

    #[error("period ends on {end} before it starts on {start}")]
    EmptyPeriod { start: NaiveDate, end: NaiveDate },

    #[error("{space} is defined more than once")]
    DuplicateSpace { space: SpaceId },

    #[error("{event} is defined more than once")]
    DuplicateEvent { event: EventId },

    #[error("{occurrence} is defined more than once")]
    DuplicateOccurrence { occurrence: OccurrenceId },

    #[error("{basket} is defined more than once")]
    DuplicateBasket { basket: BasketId },

    #[error("availability window [{start}, {end}) of {space} lies outside the period")]
    SpaceWindowOutOfRange { space: SpaceId, start: i64, end: i64 },

    #[error("{event} references {space}, which is not part of the snapshot")]
    UnknownSpace { event: EventId, space: SpaceId },

    #[error("{basket} is referenced but not defined")]
    UnknownBasket { basket: BasketId },

    #[error("{event} has a non-positive minimum duration of {min} ticks")]
    InvalidDuration { event: EventId, min: i64 },

    #[error("{event} has a minimum duration of {min} ticks exceeding its maximum of {max}")]
    DurationRange { event: EventId, min: i64, max: i64 },

    #[error("window [{start}, {end}) of {occurrence} ({event}) does not fit into one day")]
    OccurrenceWindowOutOfDay {
        event: EventId,
        occurrence: OccurrenceId,
        start: i64,
        end: i64,
    },

    #[error(
        "window of {occurrence} ({event}) is {window} ticks long, shorter than the minimum duration of {min}"
    )]
    OccurrenceWindowTooShort {
        event: EventId,
        occurrence: OccurrenceId,
        window: i64,
        min: i64,
    },

    #[error("{occurrence} recurs on period day {day}, but the period has only {num_days} days")]
    OccurrenceDayOutOfRange {
        occurrence: OccurrenceId,
        day: u32,
        num_days: u32,
    },

    #[error("{occurrence} is scheduled for {expected} but recurs on {date}, a {actual}")]
    OccurrenceWeekdayMismatch {
        occurrence: OccurrenceId,
        date: NaiveDate,
        expected: Weekday,
        actual: Weekday,
    },

    #[error("{basket} has an allocation percentage of {percentage}, expected at most 100")]
    InvalidAllocationPercentage { basket: BasketId, percentage: u8 },

    #[error("time range {begin}..{end} of {owner} is empty or reversed")]
    InvalidTimeRange {
        owner: String,
        begin: NaiveTime,
        end: NaiveTime,
    },
}
