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

//! # Allocation Validation
//!
//! Independent re-check of a finished allocation against the snapshot it
//! was computed from. The search engine enforces the same rules while
//! searching; this module exists so that callers, integration tests and the
//! tiering driver can assert them without trusting the search.

use crate::{
    id::{EventId, OccurrenceId, SpaceId},
    model::AllocationModel,
    solution::AllocatedEvent,
    time::Tick,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A rule broken by an allocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationViolation {
    #[error("{occurrence} does not belong to {event}")]
    ForeignOccurrence {
        event: EventId,
        occurrence: OccurrenceId,
    },

    #[error("{event} was granted {space}, which it did not request")]
    IneligibleSpace { event: EventId, space: SpaceId },

    #[error("{space} cannot host the {persons} persons of {event}")]
    HeadcountExceeded {
        event: EventId,
        space: SpaceId,
        persons: u32,
    },

    #[error("{occurrence} was granted more than once")]
    DuplicateOccurrence { occurrence: OccurrenceId },

    #[error("slot [{start}, {end}) of {occurrence} lies outside its requested window")]
    OutsideWindow {
        occurrence: OccurrenceId,
        start: Tick,
        end: Tick,
    },

    #[error("{occurrence} was granted {duration} ticks, outside {min}..={max}")]
    DurationOutOfRange {
        occurrence: OccurrenceId,
        duration: Tick,
        min: Tick,
        max: Tick,
    },

    #[error("{occurrence} is booked in {space} on {date} while the space is closed")]
    OutsideAvailability {
        occurrence: OccurrenceId,
        space: SpaceId,
        date: NaiveDate,
    },

    #[error("{first} and {second} overlap in {space} on {date}")]
    DoubleBooking {
        space: SpaceId,
        date: NaiveDate,
        first: OccurrenceId,
        second: OccurrenceId,
    },

    #[error("{event} was granted {count} slots in week {week}, more than its quota of {limit}")]
    QuotaExceeded {
        event: EventId,
        week: u32,
        count: u32,
        limit: u32,
    },

    #[error("{space} is booked for {used} ticks on {date}, more than its budget of {budget}")]
    CapacityExceeded {
        space: SpaceId,
        date: NaiveDate,
        used: Tick,
        budget: Tick,
    },
}

/// Checks `allocated` against every hard rule of `model`.
///
/// Returns the first violation found. Checks are ordered per grant first
/// (eligibility, headcount, window, availability), then across grants
/// (duplicates, overlaps, weekly quotas, daily budgets).
pub fn validate_allocation(
    model: &AllocationModel,
    allocated: &[AllocatedEvent],
) -> Result<(), AllocationViolation> {
    let ticks_per_day = model.ticks_per_day();
    let period = model.period();
    let date_of = |day: u32| period.date(day).unwrap_or(period.end());

    let mut granted = vec![false; model.num_occurrences()];
    let mut bookings: BTreeMap<(usize, u32), Vec<(Tick, Tick, OccurrenceId)>> = BTreeMap::new();
    let mut weekly: BTreeMap<(usize, u32), u32> = BTreeMap::new();

    for grant in allocated {
        let occurrence = model.occurrence(grant.occurrence());
        let event = model.event(occurrence.event());
        let space = model.space(grant.space());

        if occurrence.event() != grant.event() {
            return Err(AllocationViolation::ForeignOccurrence {
                event: grant.event_id(),
                occurrence: grant.occurrence_id(),
            });
        }
        if !event.is_eligible(grant.space()) {
            return Err(AllocationViolation::IneligibleSpace {
                event: event.id(),
                space: space.id(),
            });
        }
        if !space.admits(event.num_persons()) {
            return Err(AllocationViolation::HeadcountExceeded {
                event: event.id(),
                space: space.id(),
                persons: event.num_persons().unwrap_or_default(),
            });
        }
        if std::mem::replace(&mut granted[grant.occurrence().get()], true) {
            return Err(AllocationViolation::DuplicateOccurrence {
                occurrence: occurrence.id(),
            });
        }
        if !occurrence.window().contains_interval(grant.slot()) {
            return Err(AllocationViolation::OutsideWindow {
                occurrence: occurrence.id(),
                start: grant.start(),
                end: grant.end(),
            });
        }
        if grant.duration() < event.min_duration() || grant.duration() > event.max_duration() {
            return Err(AllocationViolation::DurationOutOfRange {
                occurrence: occurrence.id(),
                duration: grant.duration(),
                min: event.min_duration(),
                max: event.max_duration(),
            });
        }

        for &day in occurrence.days() {
            if !space.is_open(day, grant.slot(), ticks_per_day) {
                return Err(AllocationViolation::OutsideAvailability {
                    occurrence: occurrence.id(),
                    space: space.id(),
                    date: date_of(day),
                });
            }
            bookings
                .entry((grant.space().get(), day))
                .or_default()
                .push((grant.start(), grant.end(), occurrence.id()));
        }

        let mut weeks: Vec<u32> = occurrence.days().iter().map(|&d| period.week_of(d)).collect();
        weeks.dedup();
        for week in weeks {
            let count = weekly.entry((occurrence.event().get(), week)).or_default();
            *count += 1;
            if *count > event.events_per_week() {
                return Err(AllocationViolation::QuotaExceeded {
                    event: event.id(),
                    week,
                    count: *count,
                    limit: event.events_per_week(),
                });
            }
        }
    }

    for ((space_index, day), mut slots) in bookings {
        let space = &model.spaces()[space_index];
        slots.sort_unstable();
        if let Some(pair) = slots.windows(2).find(|pair| pair[1].0 < pair[0].1) {
            return Err(AllocationViolation::DoubleBooking {
                space: space.id(),
                date: date_of(day),
                first: pair[0].2,
                second: pair[1].2,
            });
        }
        let used: Tick = slots.iter().map(|(start, end, _)| end - start).sum();
        if used > space.capacity_on(day) {
            return Err(AllocationViolation::CapacityExceeded {
                space: space.id(),
                date: date_of(day),
                used,
                budget: space.capacity_on(day),
            });
        }
    }

    Ok(())
}
