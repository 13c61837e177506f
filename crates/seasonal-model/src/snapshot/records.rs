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

//! Serializable input records of an application round.
//!
//! These mirror what the surrounding booking system knows about a round:
//! its spaces with opening hours, the applications with their requested
//! events and weekly schedules, and the allocation baskets. All of them
//! deserialize from JSON.

use crate::id::{ApplicationId, BasketId, EventId, OccurrenceId, SpaceId};
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub period: PeriodRecord,
    #[serde(default)]
    pub spaces: Vec<SpaceRecord>,
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
    #[serde(default)]
    pub baskets: Vec<BasketRecord>,
    /// Restricts which baskets' grants are reported. `None` reports all.
    #[serde(default)]
    pub output_baskets: Option<Vec<BasketId>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRecord {
    pub id: SpaceId,
    pub name: String,
    #[serde(default)]
    pub max_persons: Option<u32>,
    /// Weekly opening hours. Empty means the configured default window every day.
    #[serde(default)]
    pub opening_hours: Vec<WeeklyHoursRecord>,
    #[serde(default)]
    pub closed_dates: Vec<NaiveDate>,
    /// Existing reservations that already occupy the space.
    #[serde(default)]
    pub blocked: Vec<BlockedRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHoursRecord {
    pub weekday: Weekday,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedRecord {
    pub date: NaiveDate,
    pub begin: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    #[serde(default)]
    pub applicant: ApplicantRecord,
    #[serde(default)]
    pub events: Vec<EventRequestRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub home_city: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequestRecord {
    pub id: EventId,
    pub name: String,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub num_persons: Option<u32>,
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    #[serde(default = "default_events_per_week")]
    pub events_per_week: u32,
    /// Recur every second week instead of weekly.
    #[serde(default)]
    pub biweekly: bool,
    /// First date the event may take place, if later than the period start.
    #[serde(default)]
    pub begin: Option<NaiveDate>,
    /// Last date the event may take place, if earlier than the period end.
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub space_ids: Vec<SpaceId>,
    #[serde(default)]
    pub schedules: Vec<ScheduleRecord>,
}

fn default_events_per_week() -> u32 {
    1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: OccurrenceId,
    pub weekday: Weekday,
    pub begin: NaiveTime,
    pub end: NaiveTime,
}

/// A basket and its membership rule.
///
/// Every criterion that is set must match the event (purpose, age group) or
/// its applicant (customer type, home city). Unset criteria match anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketRecord {
    pub id: BasketId,
    pub name: String,
    pub order_number: u32,
    #[serde(default = "default_allocation_percentage")]
    pub allocation_percentage: u8,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub home_city: Option<String>,
}

fn default_allocation_percentage() -> u8 {
    100
}
