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

//! # Time Discretization
//!
//! The engine reasons about whole ticks. A `TickResolution` fixes how many
//! minutes one tick spans; a `Period` fixes the calendar range the ticks are
//! measured against. Two coordinate systems are used throughout:
//!
//! * **tick of day**: `0..ticks_per_day`, used for requested windows and the
//!   resolved start and end of a booking (a weekly slot repeats at the same
//!   time of day on every date it recurs).
//! * **period tick**: `day * ticks_per_day + tick_of_day`, used for the
//!   availability calendar of a space.

use crate::err::ModelError;
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// The integer time unit of the engine.
pub type Tick = i64;

/// Number of minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// The number of minutes represented by one tick.
///
/// Must be positive and divide a day evenly, so that every day starts on a
/// tick boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TickResolution {
    minutes_per_tick: u32,
}

impl TickResolution {
    /// One tick per minute.
    pub const MINUTE: Self = Self { minutes_per_tick: 1 };

    /// One tick per quarter hour, the granularity bookings are made in.
    pub const QUARTER_HOUR: Self = Self {
        minutes_per_tick: 15,
    };

    /// Creates a resolution, validating that it divides a day.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use seasonal_model::time::TickResolution;
    /// assert_eq!(TickResolution::try_new(30).unwrap().ticks_per_day(), 48);
    /// assert!(TickResolution::try_new(7).is_err());
    /// ```
    pub fn try_new(minutes_per_tick: u32) -> Result<Self, ModelError> {
        if minutes_per_tick == 0 || MINUTES_PER_DAY % minutes_per_tick != 0 {
            return Err(ModelError::InvalidResolution {
                minutes: minutes_per_tick,
            });
        }
        Ok(Self { minutes_per_tick })
    }

    #[inline]
    pub const fn minutes_per_tick(&self) -> u32 {
        self.minutes_per_tick
    }

    #[inline]
    pub const fn ticks_per_day(&self) -> Tick {
        (MINUTES_PER_DAY / self.minutes_per_tick) as Tick
    }

    /// Converts a number of minutes to ticks, rounding down.
    #[inline]
    pub const fn ticks_floor(&self, minutes: u32) -> Tick {
        (minutes / self.minutes_per_tick) as Tick
    }

    /// Converts a number of minutes to ticks, rounding up.
    #[inline]
    pub const fn ticks_ceil(&self, minutes: u32) -> Tick {
        minutes.div_ceil(self.minutes_per_tick) as Tick
    }

    /// Converts a tick count back to minutes.
    #[inline]
    pub const fn minutes(&self, ticks: Tick) -> i64 {
        ticks * self.minutes_per_tick as i64
    }

    /// The first tick of day at or after `time`.
    #[inline]
    pub fn tick_of_day_ceil(&self, time: NaiveTime) -> Tick {
        self.ticks_ceil(minute_of_day_ceil(time))
    }

    /// The last tick of day at or before `time`.
    #[inline]
    pub fn tick_of_day_floor(&self, time: NaiveTime) -> Tick {
        self.ticks_floor(time.num_seconds_from_midnight() / 60)
    }
}

impl Default for TickResolution {
    fn default() -> Self {
        Self::QUARTER_HOUR
    }
}

impl TryFrom<u32> for TickResolution {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<TickResolution> for u32 {
    fn from(value: TickResolution) -> Self {
        value.minutes_per_tick
    }
}

impl std::fmt::Display for TickResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min/tick", self.minutes_per_tick)
    }
}

#[inline]
fn minute_of_day_ceil(time: NaiveTime) -> u32 {
    let seconds = time.num_seconds_from_midnight();
    let has_fraction = seconds % 60 != 0 || time.nanosecond() != 0;
    seconds / 60 + u32::from(has_fraction)
}

/// Converts a minute of day (`0..1440`) to a wall clock time.
#[inline]
pub fn time_of_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(minute.checked_mul(60)?, 0)
}

/// An inclusive calendar range `[start, end]` the allocation is computed for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    /// Creates a period, rejecting an end date before the start date.
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, ModelError> {
        if end < start {
            return Err(ModelError::EmptyPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the period, both ends included.
    #[inline]
    pub fn num_days(&self) -> u32 {
        (self.end.signed_duration_since(self.start).num_days() + 1) as u32
    }

    /// Returns the date of period day `day`, or `None` if it is past the end.
    #[inline]
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        if day >= self.num_days() {
            return None;
        }
        self.start.checked_add_days(Days::new(u64::from(day)))
    }

    /// Returns the period day of `date`, or `None` if the date is outside the period.
    #[inline]
    pub fn day_index(&self, date: NaiveDate) -> Option<u32> {
        self.contains(date)
            .then(|| date.signed_duration_since(self.start).num_days() as u32)
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The weekday of period day `day`.
    #[inline]
    pub fn weekday(&self, day: u32) -> Weekday {
        (0..day % 7).fold(self.start.weekday(), |weekday, _| weekday.succ())
    }

    /// The calendar week of period day `day`.
    ///
    /// Weeks start on Monday; week `0` is the week containing the period start.
    #[inline]
    pub fn week_of(&self, day: u32) -> u32 {
        (self.start.weekday().num_days_from_monday() + day) / 7
    }

    /// Iterates over all dates of the period in order.
    pub fn dates(&self) -> impl Iterator<Item = (u32, NaiveDate)> + '_ {
        (0..self.num_days()).filter_map(move |day| self.date(day).map(|date| (day, date)))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_resolution_validation() {
        assert!(TickResolution::try_new(0).is_err());
        assert!(TickResolution::try_new(7).is_err());
        assert_eq!(TickResolution::try_new(15).unwrap(), TickResolution::QUARTER_HOUR);
        assert_eq!(TickResolution::MINUTE.ticks_per_day(), 1440);
        assert_eq!(TickResolution::QUARTER_HOUR.ticks_per_day(), 96);
    }

    #[test]
    fn test_resolution_rounding() {
        let r = TickResolution::QUARTER_HOUR;
        assert_eq!(r.ticks_floor(50), 3);
        assert_eq!(r.ticks_ceil(50), 4);
        assert_eq!(r.ticks_ceil(45), 3);
        assert_eq!(r.tick_of_day_ceil(time(10, 5)), 41);
        assert_eq!(r.tick_of_day_floor(time(10, 5)), 40);
        assert_eq!(r.tick_of_day_ceil(time(10, 0)), 40);
        assert_eq!(r.minutes(41), 615);
    }

    #[test]
    fn test_resolution_serde_validates() {
        let r: TickResolution = serde_json::from_str("30").unwrap();
        assert_eq!(r.ticks_per_day(), 48);
        assert!(serde_json::from_str::<TickResolution>("11").is_err());
    }

    #[test]
    fn test_time_of_minute() {
        assert_eq!(time_of_minute(615), Some(time(10, 15)));
        assert_eq!(time_of_minute(0), Some(time(0, 0)));
        assert_eq!(time_of_minute(MINUTES_PER_DAY), None);
    }

    #[test]
    fn test_period_day_mapping() {
        // 2024-01-01 is a Monday.
        let p = Period::try_new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(p.num_days(), 31);
        assert_eq!(p.date(0), Some(date(2024, 1, 1)));
        assert_eq!(p.date(30), Some(date(2024, 1, 31)));
        assert_eq!(p.date(31), None);
        assert_eq!(p.day_index(date(2024, 1, 10)), Some(9));
        assert_eq!(p.day_index(date(2024, 2, 1)), None);
        assert_eq!(p.weekday(0), Weekday::Mon);
        assert_eq!(p.weekday(9), Weekday::Wed);
        assert_eq!(p.dates().count(), 31);
    }

    #[test]
    fn test_period_weeks_start_on_monday() {
        // 2024-01-03 is a Wednesday.
        let p = Period::try_new(date(2024, 1, 3), date(2024, 1, 20)).unwrap();
        assert_eq!(p.week_of(0), 0);
        assert_eq!(p.week_of(4), 0); // Sunday 7th
        assert_eq!(p.week_of(5), 1); // Monday 8th
        assert_eq!(p.week_of(12), 2); // Monday 15th
    }

    #[test]
    fn test_period_rejects_reversed_range() {
        let err = Period::try_new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ModelError::EmptyPeriod { .. }));
        assert_eq!(Period::try_new(date(2024, 2, 1), date(2024, 2, 1)).unwrap().num_days(), 1);
    }
}
