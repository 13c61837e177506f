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
    id::{ApplicationId, EventId, OccurrenceId},
    index::{BasketIndex, EventIndex, OccurrenceIndex, SpaceIndex},
    time::{Period, Tick},
};
use chrono::{NaiveDate, Weekday};
use seasonal_core::math::interval::ClosedOpenInterval;

/// A recurring reservation request.
///
/// An event asks for `events_per_week` weekly slots, each between
/// `min_duration` and `max_duration` ticks long, in any of its eligible
/// spaces. The concrete slots it would accept are its occurrences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub(crate) id: EventId,
    pub(crate) name: String,
    pub(crate) application: Option<ApplicationId>,
    pub(crate) eligible_spaces: Vec<SpaceIndex>,
    pub(crate) occurrences: Vec<OccurrenceIndex>,
    pub(crate) min_duration: Tick,
    pub(crate) max_duration: Tick,
    pub(crate) events_per_week: u32,
    pub(crate) num_persons: Option<u32>,
    pub(crate) baskets: Vec<BasketIndex>,
}

impl Event {
    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn application(&self) -> Option<ApplicationId> {
        self.application
    }

    #[inline]
    pub fn eligible_spaces(&self) -> &[SpaceIndex] {
        &self.eligible_spaces
    }

    #[inline]
    pub fn is_eligible(&self, space: SpaceIndex) -> bool {
        self.eligible_spaces.contains(&space)
    }

    #[inline]
    pub fn occurrences(&self) -> &[OccurrenceIndex] {
        &self.occurrences
    }

    #[inline]
    pub fn min_duration(&self) -> Tick {
        self.min_duration
    }

    #[inline]
    pub fn max_duration(&self) -> Tick {
        self.max_duration
    }

    /// The maximum number of occurrences that may be granted per calendar week.
    #[inline]
    pub fn events_per_week(&self) -> u32 {
        self.events_per_week
    }

    #[inline]
    pub fn num_persons(&self) -> Option<u32> {
        self.num_persons
    }

    /// The baskets this event belongs to, in insertion order.
    #[inline]
    pub fn baskets(&self) -> &[BasketIndex] {
        &self.baskets
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' ({}x/week, {}..={} ticks)",
            self.id, self.name, self.events_per_week, self.min_duration, self.max_duration
        )
    }
}

/// One weekly slot of an event.
///
/// The slot asks for a time inside `window` (ticks of day) on `weekday`,
/// repeated on every period day in `days`. A grant is a single start time
/// that is used on all of those days.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub(crate) id: OccurrenceId,
    pub(crate) event: EventIndex,
    pub(crate) weekday: Weekday,
    pub(crate) window: ClosedOpenInterval<Tick>,
    pub(crate) days: Vec<u32>,
}

impl Occurrence {
    #[inline]
    pub fn id(&self) -> OccurrenceId {
        self.id
    }

    #[inline]
    pub fn event(&self) -> EventIndex {
        self.event
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// The requested window in ticks of day.
    #[inline]
    pub fn window(&self) -> ClosedOpenInterval<Tick> {
        self.window
    }

    /// The sorted period days this slot recurs on.
    #[inline]
    pub fn days(&self) -> &[u32] {
        &self.days
    }

    /// Returns `true` if the slot recurs on at least one day both occurrences share.
    pub fn shares_day_with(&self, other: &Occurrence) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.days.len() && j < other.days.len() {
            match self.days[i].cmp(&other.days[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    /// The concrete calendar dates of this slot.
    pub fn dates(&self, period: &Period) -> Vec<NaiveDate> {
        self.days.iter().filter_map(|&day| period.date(day)).collect()
    }
}

impl std::fmt::Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} {}, {} dates)",
            self.id,
            self.weekday,
            self.window,
            self.days.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(days: Vec<u32>) -> Occurrence {
        Occurrence {
            id: OccurrenceId(1),
            event: EventIndex::new(0),
            weekday: Weekday::Mon,
            window: ClosedOpenInterval::new(40, 60),
            days,
        }
    }

    #[test]
    fn test_shares_day_with() {
        let weekly = occurrence(vec![0, 7, 14, 21]);
        let odd_weeks = occurrence(vec![7, 21]);
        let later = occurrence(vec![28, 35]);
        assert!(weekly.shares_day_with(&odd_weeks));
        assert!(odd_weeks.shares_day_with(&weekly));
        assert!(!weekly.shares_day_with(&later));
        assert!(!occurrence(Vec::new()).shares_day_with(&weekly));
    }

    #[test]
    fn test_dates() {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let dates = occurrence(vec![0, 14]).dates(&period);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
            ]
        );
    }
}
