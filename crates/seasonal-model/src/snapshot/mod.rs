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

//! # Domain Snapshot
//!
//! Turns the records of an application round into an immutable
//! `AllocationModel`.
//!
//! ## Steps
//!
//! 1. Spaces: weekly opening hours (or the configured default window) are
//!    flattened into period ticks. Closed dates and existing reservations
//!    are cut out, and the configured daily budget caps each day.
//! 2. Baskets are copied; each event joins every basket whose rule accepts
//!    the event and its applicant.
//! 3. Every schedule of an event becomes one occurrence that recurs on all
//!    matching dates of the event's own date range.
//!
//! Events without eligible spaces or without schedules are kept; they can
//! never be granted but they are still part of the round. A reference to an
//! unknown space is a configuration error and fails the whole snapshot.

pub mod config;
pub mod records;
pub mod recurrence;
pub mod rules;

use crate::{
    err::ModelError,
    index::BasketIndex,
    model::{AllocationModel, BasketSpec, EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
    time::{MINUTES_PER_DAY, Period, Tick, TickResolution},
};
use chrono::{Datelike, NaiveTime, Timelike};
use config::SnapshotConfig;
use records::{RoundRecord, SpaceRecord};
use rules::EventAttributes;
use seasonal_core::math::interval::ClosedOpenInterval;

/// A validated model together with the caller's output filter.
#[derive(Clone, Debug)]
pub struct RoundSnapshot {
    model: AllocationModel,
    output_baskets: Option<Vec<BasketIndex>>,
}

impl RoundSnapshot {
    pub fn new(model: AllocationModel, output_baskets: Option<Vec<BasketIndex>>) -> Self {
        Self {
            model,
            output_baskets,
        }
    }

    #[inline]
    pub fn model(&self) -> &AllocationModel {
        &self.model
    }

    /// The baskets whose grants are reported, or `None` for all.
    #[inline]
    pub fn output_baskets(&self) -> Option<&[BasketIndex]> {
        self.output_baskets.as_deref()
    }

    pub fn into_parts(self) -> (AllocationModel, Option<Vec<BasketIndex>>) {
        (self.model, self.output_baskets)
    }
}

/// The end of `begin..end` in seconds of day, with `00:00` read as midnight
/// at the end of the day. Fails unless the end lies after the begin.
fn checked_end_seconds(
    begin: NaiveTime,
    end: NaiveTime,
    owner: impl FnOnce() -> String,
) -> Result<u32, ModelError> {
    let begin_seconds = begin.num_seconds_from_midnight();
    let end_seconds = match end.num_seconds_from_midnight() {
        0 => MINUTES_PER_DAY * 60,
        seconds => seconds,
    };
    if end_seconds <= begin_seconds {
        return Err(ModelError::InvalidTimeRange {
            owner: owner(),
            begin,
            end,
        });
    }
    Ok(end_seconds)
}

/// Converts a wall clock range into ticks of day, rounding inward.
///
/// Returns `Ok(None)` when the range is valid but shorter than one tick.
fn day_window(
    resolution: TickResolution,
    begin: NaiveTime,
    end: NaiveTime,
    owner: impl FnOnce() -> String,
) -> Result<Option<ClosedOpenInterval<Tick>>, ModelError> {
    let end_seconds = checked_end_seconds(begin, end, owner)?;
    let start = resolution.tick_of_day_ceil(begin);
    let stop = resolution.ticks_floor(end_seconds / 60);
    Ok((start < stop).then(|| ClosedOpenInterval::new(start, stop)))
}

/// Builds `RoundSnapshot`s from `RoundRecord`s.
#[derive(Clone, Debug, Default)]
pub struct SnapshotBuilder {
    config: SnapshotConfig,
}

impl SnapshotBuilder {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            spaces = round.spaces.len(),
            applications = round.applications.len(),
            baskets = round.baskets.len()
        )
    )]
    pub fn build(&self, round: &RoundRecord) -> Result<RoundSnapshot, ModelError> {
        let period = Period::try_new(round.period.start, round.period.end)?;
        let resolution = self.config.resolution;
        let mut builder = ModelBuilder::new(period, resolution);

        for record in &round.spaces {
            self.add_space(&mut builder, record)?;
        }

        for basket in &round.baskets {
            builder.add_basket(
                BasketSpec::new(basket.id, basket.name.clone(), basket.order_number)
                    .with_allocation_percentage(basket.allocation_percentage),
            );
        }

        for application in &round.applications {
            for request in &application.events {
                let mut spec = EventSpec::new(
                    request.id,
                    request.name.clone(),
                    resolution.ticks_ceil(request.min_duration_minutes),
                )
                .with_durations(
                    resolution.ticks_ceil(request.min_duration_minutes),
                    resolution.ticks_ceil(request.max_duration_minutes),
                )
                .with_events_per_week(request.events_per_week)
                .with_application(application.id);
                spec.num_persons = request.num_persons;
                let event = builder.add_event(spec);

                for &space in &request.space_ids {
                    builder.add_event_space(event, space);
                }

                let attributes = EventAttributes {
                    purpose: request.purpose.as_deref(),
                    age_group: request.age_group.as_deref(),
                    customer_type: application.applicant.customer_type.as_deref(),
                    home_city: application.applicant.home_city.as_deref(),
                };
                for basket in round.baskets.iter().filter(|b| b.matches(&attributes)) {
                    builder.add_event_basket(event, basket.id);
                }

                for schedule in &request.schedules {
                    let window = day_window(resolution, schedule.begin, schedule.end, || {
                        schedule.id.to_string()
                    })?
                    .unwrap_or_default();
                    let days = recurrence::expand_weekly(
                        &period,
                        schedule.weekday,
                        request.begin,
                        request.end,
                        request.biweekly,
                    );
                    builder.add_occurrence(
                        event,
                        OccurrenceSpec::new(schedule.id, schedule.weekday, window).with_days(days),
                    );
                }

                if request.space_ids.is_empty() || request.schedules.is_empty() {
                    tracing::warn!(
                        event = %request.id,
                        spaces = request.space_ids.len(),
                        schedules = request.schedules.len(),
                        "event can never be granted"
                    );
                }
            }
        }

        let model = builder.build()?;
        let output_baskets = round
            .output_baskets
            .as_ref()
            .map(|ids| {
                ids.iter()
                    .map(|&basket| {
                        model
                            .basket_index(basket)
                            .ok_or(ModelError::UnknownBasket { basket })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        tracing::debug!(
            spaces = model.num_spaces(),
            events = model.num_events(),
            occurrences = model.num_occurrences(),
            days = period.num_days(),
            "snapshot built"
        );
        Ok(RoundSnapshot::new(model, output_baskets))
    }

    fn add_space(&self, builder: &mut ModelBuilder, record: &SpaceRecord) -> Result<(), ModelError> {
        let mut spec = SpaceSpec::new(record.id, record.name.clone());
        spec.max_persons = record.max_persons;
        let space = builder.add_space(spec);

        let period = *builder.period();
        let resolution = builder.resolution();
        let ticks_per_day = resolution.ticks_per_day();
        let owner = || record.id.to_string();

        let default_window = day_window(
            resolution,
            self.config.default_opening.open,
            self.config.default_opening.close,
            owner,
        )?;
        let mut weekly = Vec::with_capacity(record.opening_hours.len());
        for hours in &record.opening_hours {
            if let Some(window) = day_window(resolution, hours.open, hours.close, owner)? {
                weekly.push((hours.weekday, window));
            }
        }

        for (day, date) in period.dates() {
            if record.closed_dates.contains(&date) {
                continue;
            }
            let offset = Tick::from(day) * ticks_per_day;
            if record.opening_hours.is_empty() {
                if let Some(window) = default_window {
                    builder.add_space_opening(space, window.shift(offset));
                }
            } else {
                for (_, window) in weekly.iter().filter(|(weekday, _)| *weekday == date.weekday()) {
                    builder.add_space_opening(space, window.shift(offset));
                }
            }
        }

        for blocked in &record.blocked {
            let Some(day) = period.day_index(blocked.date) else {
                continue;
            };
            let end_seconds = checked_end_seconds(blocked.begin, blocked.end, owner)?;
            // Blocked time rounds outward so that partial ticks stay unavailable.
            let start = resolution.tick_of_day_floor(blocked.begin);
            let stop = resolution.ticks_ceil(end_seconds.div_ceil(60));
            let offset = Tick::from(day) * ticks_per_day;
            builder.add_space_closing(space, ClosedOpenInterval::new(start + offset, stop + offset));
        }

        builder.set_space_daily_budget(
            space,
            self.config
                .daily_budget_minutes
                .map(|minutes| resolution.ticks_floor(minutes)),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{BasketId, EventId, OccurrenceId, SpaceId};
    use chrono::{NaiveDate, Weekday};

    const ROUND: &str = r#"{
        "period": { "start": "2024-01-01", "end": "2024-01-28" },
        "spaces": [
            { "id": 1, "name": "Main hall", "max_persons": 60 },
            {
                "id": 2,
                "name": "Gym",
                "opening_hours": [
                    { "weekday": "Mon", "open": "08:00:00", "close": "12:00:00" },
                    { "weekday": "Mon", "open": "16:00:00", "close": "00:00:00" }
                ],
                "closed_dates": ["2024-01-15"],
                "blocked": [{ "date": "2024-01-08", "begin": "09:10:00", "end": "10:00:00" }]
            }
        ],
        "baskets": [
            { "id": 1, "name": "Youth", "order_number": 1, "age_group": "youth" },
            { "id": 2, "name": "Everyone", "order_number": 2 }
        ],
        "applications": [
            {
                "id": 100,
                "applicant": { "customer_type": "association", "home_city": "Helsinki" },
                "events": [
                    {
                        "id": 1000,
                        "name": "Junior floorball",
                        "age_group": "Youth",
                        "num_persons": 25,
                        "min_duration_minutes": 90,
                        "max_duration_minutes": 120,
                        "events_per_week": 2,
                        "begin": "2024-01-08",
                        "space_ids": [1, 2],
                        "schedules": [
                            { "id": 1, "weekday": "Mon", "begin": "17:00:00", "end": "20:00:00" },
                            { "id": 2, "weekday": "Thu", "begin": "17:00:00", "end": "20:00:00" }
                        ]
                    },
                    {
                        "id": 1001,
                        "name": "Board meeting",
                        "min_duration_minutes": 60,
                        "max_duration_minutes": 60
                    }
                ]
            }
        ]
    }"#;

    fn round() -> RoundRecord {
        serde_json::from_str(ROUND).unwrap()
    }

    #[test]
    fn test_build_round_snapshot() {
        let snapshot = SnapshotBuilder::default().build(&round()).unwrap();
        let model = snapshot.model();
        assert_eq!(model.num_spaces(), 2);
        assert_eq!(model.num_events(), 2);
        assert_eq!(model.num_occurrences(), 2);
        assert_eq!(model.resolution(), TickResolution::QUARTER_HOUR);
        assert!(snapshot.output_baskets().is_none());

        let floorball = model.event_index(EventId(1000)).unwrap();
        let event = model.event(floorball);
        assert_eq!(event.min_duration(), 6);
        assert_eq!(event.max_duration(), 8);
        assert_eq!(event.events_per_week(), 2);
        assert_eq!(event.eligible_spaces().len(), 2);
        assert_eq!(event.baskets().len(), 2);
        assert_eq!(model.basket(model.primary_basket(floorball).unwrap()).id(), BasketId(1));

        let monday = model.occurrence(model.occurrence_index(OccurrenceId(1)).unwrap());
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(monday.window(), ClosedOpenInterval::new(68, 80));
        assert_eq!(monday.days(), &[7, 14, 21]);

        let meeting = model.event(model.event_index(EventId(1001)).unwrap());
        assert!(meeting.eligible_spaces().is_empty());
        assert!(meeting.occurrences().is_empty());
        assert_eq!(meeting.baskets().len(), 1);
    }

    #[test]
    fn test_default_opening_and_daily_budget() {
        let snapshot = SnapshotBuilder::new(
            SnapshotConfig::default().with_daily_budget_minutes(Some(480)),
        )
        .build(&round())
        .unwrap();
        let model = snapshot.model();
        let hall = model.space(model.space_index(SpaceId(1)).unwrap());
        assert_eq!(hall.open_windows_on(3, 96), vec![ClosedOpenInterval::new(40, 88)]);
        assert_eq!(hall.capacity_on(3), 32);
        assert_eq!(hall.max_persons(), Some(60));
    }

    #[test]
    fn test_weekly_hours_closures_and_blocks() {
        let snapshot = SnapshotBuilder::new(SnapshotConfig::default().with_daily_budget_minutes(None))
            .build(&round())
            .unwrap();
        let model = snapshot.model();
        let gym = model.space(model.space_index(SpaceId(2)).unwrap());

        assert_eq!(
            gym.open_windows_on(0, 96),
            vec![ClosedOpenInterval::new(32, 48), ClosedOpenInterval::new(64, 96)]
        );
        assert!(gym.open_windows_on(1, 96).is_empty());
        assert_eq!(
            gym.open_windows_on(7, 96),
            vec![ClosedOpenInterval::new(32, 36), ClosedOpenInterval::new(40, 48), ClosedOpenInterval::new(64, 96)]
        );
        assert!(gym.open_windows_on(14, 96).is_empty());
        assert_eq!(gym.capacity_on(0), 48);
    }

    #[test]
    fn test_unknown_space_fails_fast() {
        let mut round = round();
        round.applications[0].events[0].space_ids.push(SpaceId(9));
        assert_eq!(
            SnapshotBuilder::default().build(&round).unwrap_err(),
            ModelError::UnknownSpace {
                event: EventId(1000),
                space: SpaceId(9)
            }
        );
    }

    #[test]
    fn test_output_baskets_are_resolved() {
        let mut round = round();
        round.output_baskets = Some(vec![BasketId(2)]);
        let snapshot = SnapshotBuilder::default().build(&round).unwrap();
        let expected = snapshot.model().basket_index(BasketId(2)).unwrap();
        assert_eq!(snapshot.output_baskets(), Some(&[expected][..]));

        round.output_baskets = Some(vec![BasketId(7)]);
        assert!(matches!(
            SnapshotBuilder::default().build(&round),
            Err(ModelError::UnknownBasket { basket: BasketId(7) })
        ));
    }

    #[test]
    fn test_reversed_schedule_is_rejected() {
        let mut round = round();
        let schedule = &mut round.applications[0].events[0].schedules[0];
        schedule.begin = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        schedule.end = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        assert!(matches!(
            SnapshotBuilder::default().build(&round),
            Err(ModelError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_midnight_end_closes_the_day() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(checked_end_seconds(at(16, 0), at(0, 0), String::new), Ok(86_400));
        assert_eq!(checked_end_seconds(at(9, 10), at(10, 0), String::new), Ok(36_000));
        assert!(matches!(
            checked_end_seconds(at(10, 0), at(10, 0), || "owner".to_string()),
            Err(ModelError::InvalidTimeRange { owner, .. }) if owner == "owner"
        ));
    }

    #[test]
    fn test_blocked_time_follows_the_shared_range_rules() {
        let mut round = round();
        let mut late = round.spaces[1].blocked[0];
        late.date = NaiveDate::from_ymd_opt(2024, 1, 22).unwrap();
        late.begin = NaiveTime::from_hms_opt(22, 10, 0).unwrap();
        late.end = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        round.spaces[1].blocked.push(late);

        let snapshot = SnapshotBuilder::new(SnapshotConfig::default().with_daily_budget_minutes(None))
            .build(&round)
            .unwrap();
        let model = snapshot.model();
        let gym = model.space(model.space_index(SpaceId(2)).unwrap());
        assert_eq!(
            gym.open_windows_on(21, 96),
            vec![ClosedOpenInterval::new(32, 48), ClosedOpenInterval::new(64, 88)]
        );

        late.begin = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        late.end = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        round.spaces[1].blocked.push(late);
        assert!(matches!(
            SnapshotBuilder::default().build(&round),
            Err(ModelError::InvalidTimeRange { owner, .. }) if owner == SpaceId(2).to_string()
        ));
    }

    #[test]
    fn test_period_is_validated() {
        let mut round = round();
        round.period.end = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert!(matches!(
            SnapshotBuilder::default().build(&round),
            Err(ModelError::EmptyPeriod { .. })
        ));
    }
}
