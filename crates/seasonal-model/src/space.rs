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

use crate::{id::SpaceId, time::Tick};
use seasonal_core::math::{interval::ClosedOpenInterval, set};

/// A bookable space with its remaining availability.
///
/// `availability` is a normalized list of period ticks (see `time`), and
/// `daily_capacity[day]` is the number of ticks that may still be granted on
/// period day `day`. Both shrink as higher-priority tiers consume the space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Space {
    id: SpaceId,
    name: String,
    max_persons: Option<u32>,
    availability: Vec<ClosedOpenInterval<Tick>>,
    daily_capacity: Vec<Tick>,
}

impl Space {
    pub(crate) fn new(
        id: SpaceId,
        name: String,
        max_persons: Option<u32>,
        availability: Vec<ClosedOpenInterval<Tick>>,
        daily_capacity: Vec<Tick>,
    ) -> Self {
        debug_assert!(
            set::is_normalized(&availability),
            "called `Space::new` with unnormalized availability for {}",
            id
        );
        Self {
            id,
            name,
            max_persons,
            availability,
            daily_capacity,
        }
    }

    #[inline]
    pub fn id(&self) -> SpaceId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn max_persons(&self) -> Option<u32> {
        self.max_persons
    }

    /// The open windows of the space in period ticks.
    #[inline]
    pub fn availability(&self) -> &[ClosedOpenInterval<Tick>] {
        &self.availability
    }

    #[inline]
    pub fn daily_capacity(&self) -> &[Tick] {
        &self.daily_capacity
    }

    /// The remaining capacity budget on period day `day`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `day` is outside the period.
    #[inline]
    pub fn capacity_on(&self, day: u32) -> Tick {
        let index = day as usize;
        debug_assert!(
            index < self.daily_capacity.len(),
            "called `Space::capacity_on` with day index out of bounds: the len is {} but the index is {}",
            self.daily_capacity.len(),
            index
        );
        self.daily_capacity.get(index).copied().unwrap_or(0)
    }

    /// Returns `true` if a group of `num_persons` fits into the space.
    ///
    /// An unknown headcount or an unlimited space always fits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_model::model::{ModelBuilder, SpaceSpec};
    /// # use seasonal_model::time::{Period, TickResolution};
    /// # use seasonal_model::id::SpaceId;
    /// # use chrono::NaiveDate;
    /// let period = Period::try_new(
    ///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
    /// ).unwrap();
    /// let mut builder = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);
    /// let hall = builder.add_space(SpaceSpec::new(SpaceId(1), "Hall").with_max_persons(20));
    /// let model = builder.build().unwrap();
    /// assert!(model.space(hall).admits(Some(20)));
    /// assert!(!model.space(hall).admits(Some(21)));
    /// assert!(model.space(hall).admits(None));
    /// ```
    #[inline]
    pub fn admits(&self, num_persons: Option<u32>) -> bool {
        match (self.max_persons, num_persons) {
            (Some(max), Some(persons)) => persons <= max,
            _ => true,
        }
    }

    /// The open windows on period day `day`, in ticks of day.
    pub fn open_windows_on(&self, day: u32, ticks_per_day: Tick) -> Vec<ClosedOpenInterval<Tick>> {
        let offset = Tick::from(day) * ticks_per_day;
        set::clip(
            &self.availability,
            ClosedOpenInterval::new(offset, offset + ticks_per_day),
        )
        .into_iter()
        .map(|window| window.shift(-offset))
        .collect()
    }

    /// Returns `true` if `window` (ticks of day) is completely open on period day `day`.
    pub fn is_open(&self, day: u32, window: ClosedOpenInterval<Tick>, ticks_per_day: Tick) -> bool {
        let target = window.shift(Tick::from(day) * ticks_per_day);
        let pos = self
            .availability
            .partition_point(|open| open.end() <= target.start());
        self.availability
            .get(pos)
            .is_some_and(|open| open.contains_interval(target))
    }

    /// Removes a granted `window` (ticks of day) on `day` and charges `duration` to the day budget.
    pub(crate) fn consume(
        &mut self,
        day: u32,
        window: ClosedOpenInterval<Tick>,
        duration: Tick,
        ticks_per_day: Tick,
    ) {
        let target = window.shift(Tick::from(day) * ticks_per_day);
        self.availability = set::subtract(&self.availability, &[target]);
        if let Some(budget) = self.daily_capacity.get_mut(day as usize) {
            *budget = (*budget - duration).max(0);
        }
    }
}

impl std::fmt::Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max_persons {
            Some(max) => write!(f, "{} '{}' (max {} persons)", self.id, self.name, max),
            None => write!(f, "{} '{}'", self.id, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKS_PER_DAY: Tick = 96;

    fn iv(start: Tick, end: Tick) -> ClosedOpenInterval<Tick> {
        ClosedOpenInterval::new(start, end)
    }

    fn hall() -> Space {
        // Day 0 open 10:00-22:00, day 1 open 08:00-12:00 and 14:00-16:00.
        Space::new(
            SpaceId(1),
            "Hall".to_string(),
            Some(30),
            vec![iv(40, 88), iv(96 + 32, 96 + 48), iv(96 + 56, 96 + 64)],
            vec![40, 24],
        )
    }

    #[test]
    fn test_open_windows_on_is_day_relative() {
        let space = hall();
        assert_eq!(space.open_windows_on(0, TICKS_PER_DAY), vec![iv(40, 88)]);
        assert_eq!(space.open_windows_on(1, TICKS_PER_DAY), vec![iv(32, 48), iv(56, 64)]);
        assert!(space.open_windows_on(2, TICKS_PER_DAY).is_empty());
    }

    #[test]
    fn test_is_open() {
        let space = hall();
        assert!(space.is_open(0, iv(40, 88), TICKS_PER_DAY));
        assert!(!space.is_open(0, iv(39, 41), TICKS_PER_DAY));
        assert!(space.is_open(1, iv(56, 64), TICKS_PER_DAY));
        assert!(!space.is_open(1, iv(44, 60), TICKS_PER_DAY));
    }

    #[test]
    fn test_consume_splits_availability_and_charges_budget() {
        let mut space = hall();
        space.consume(0, iv(48, 56), 8, TICKS_PER_DAY);
        assert_eq!(space.open_windows_on(0, TICKS_PER_DAY), vec![iv(40, 48), iv(56, 88)]);
        assert_eq!(space.capacity_on(0), 32);

        space.consume(1, iv(32, 48), 30, TICKS_PER_DAY);
        assert_eq!(space.capacity_on(1), 0);
        assert_eq!(space.open_windows_on(1, TICKS_PER_DAY), vec![iv(56, 64)]);
    }

    #[test]
    fn test_admits() {
        let space = hall();
        assert!(space.admits(Some(30)));
        assert!(!space.admits(Some(31)));
        assert!(space.admits(None));
    }
}
