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

use crate::{
    id::{ApplicationId, BasketId, EventId, OccurrenceId, SpaceId},
    index::{BasketIndex, EventIndex, OccurrenceIndex, SpaceIndex},
    model::AllocationModel,
    time::{Tick, time_of_minute},
};
use chrono::{NaiveDate, NaiveTime, Weekday};
use seasonal_core::math::interval::ClosedOpenInterval;
use serde::Serialize;

/// One granted weekly slot: an occurrence placed in a space at a fixed time of day.
///
/// The grant repeats on every date of the occurrence. Start and end are
/// kept both in ticks of day and in minutes of day; the wall clock
/// accessors return `None` for an end at midnight, which `NaiveTime`
/// cannot represent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AllocatedEvent {
    space_id: SpaceId,
    event_id: EventId,
    occurrence_id: OccurrenceId,
    application_id: Option<ApplicationId>,
    basket_id: Option<BasketId>,
    weekday: Weekday,
    start: Tick,
    end: Tick,
    begin_minute: u32,
    end_minute: u32,
    duration: Tick,
    dates: Vec<NaiveDate>,
    #[serde(skip)]
    space: SpaceIndex,
    #[serde(skip)]
    event: EventIndex,
    #[serde(skip)]
    occurrence: OccurrenceIndex,
}

impl AllocatedEvent {
    /// Creates the grant of `occurrence` in `space`, starting at tick of day `start`.
    ///
    /// The granted duration is the event's minimum duration.
    ///
    /// # Panics
    ///
    /// Panics if `space` or `occurrence` are out of bounds for `model`.
    pub fn new(
        model: &AllocationModel,
        space: SpaceIndex,
        occurrence: OccurrenceIndex,
        start: Tick,
        basket: Option<BasketIndex>,
    ) -> Self {
        let occ = model.occurrence(occurrence);
        let event = model.event(occ.event());
        let duration = event.min_duration();
        let end = start + duration;
        debug_assert!(
            occ.window()
                .contains_interval(ClosedOpenInterval::new(start, end)),
            "called `AllocatedEvent::new` with slot [{}, {}) outside the window {} of {}",
            start,
            end,
            occ.window(),
            occ.id()
        );

        let resolution = model.resolution();
        Self {
            space_id: model.space(space).id(),
            event_id: event.id(),
            occurrence_id: occ.id(),
            application_id: event.application(),
            basket_id: basket.map(|b| model.basket(b).id()),
            weekday: occ.weekday(),
            start,
            end,
            begin_minute: resolution.minutes(start) as u32,
            end_minute: resolution.minutes(end) as u32,
            duration,
            dates: occ.dates(model.period()),
            space,
            event: occ.event(),
            occurrence,
        }
    }

    #[inline]
    pub fn space_id(&self) -> SpaceId {
        self.space_id
    }

    #[inline]
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    #[inline]
    pub fn occurrence_id(&self) -> OccurrenceId {
        self.occurrence_id
    }

    #[inline]
    pub fn application_id(&self) -> Option<ApplicationId> {
        self.application_id
    }

    /// The basket of the tier that granted this slot.
    #[inline]
    pub fn basket_id(&self) -> Option<BasketId> {
        self.basket_id
    }

    #[inline]
    pub fn space(&self) -> SpaceIndex {
        self.space
    }

    #[inline]
    pub fn event(&self) -> EventIndex {
        self.event
    }

    #[inline]
    pub fn occurrence(&self) -> OccurrenceIndex {
        self.occurrence
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Start tick of day (inclusive).
    #[inline]
    pub fn start(&self) -> Tick {
        self.start
    }

    /// End tick of day (exclusive).
    #[inline]
    pub fn end(&self) -> Tick {
        self.end
    }

    /// The granted slot in ticks of day.
    #[inline]
    pub fn slot(&self) -> ClosedOpenInterval<Tick> {
        ClosedOpenInterval::new(self.start, self.end)
    }

    #[inline]
    pub fn duration(&self) -> Tick {
        self.duration
    }

    #[inline]
    pub fn begin_minute(&self) -> u32 {
        self.begin_minute
    }

    #[inline]
    pub fn end_minute(&self) -> u32 {
        self.end_minute
    }

    #[inline]
    pub fn begin_time(&self) -> Option<NaiveTime> {
        time_of_minute(self.begin_minute)
    }

    #[inline]
    pub fn end_time(&self) -> Option<NaiveTime> {
        time_of_minute(self.end_minute)
    }

    /// The calendar dates the slot is granted on.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }
}

impl std::fmt::Display for AllocatedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) -> {} {} {:02}:{:02}-{:02}:{:02} on {} dates",
            self.event_id,
            self.occurrence_id,
            self.space_id,
            self.weekday,
            self.begin_minute / 60,
            self.begin_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60,
            self.dates.len()
        )
    }
}
