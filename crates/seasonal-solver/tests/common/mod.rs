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

#![allow(dead_code)]

use chrono::{NaiveDate, Weekday};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seasonal_core::math::interval::ClosedOpenInterval;
use seasonal_model::{
    id::{BasketId, EventId, OccurrenceId, SpaceId},
    model::{AllocationModel, BasketSpec, EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec},
    time::{Period, Tick, TickResolution},
};
use seasonal_solver::{config::SolverConfig, context::RunContext};
use tracing_subscriber::{EnvFilter, fmt};

/// Routes `tracing` output of the library through the test harness.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

pub fn context() -> RunContext {
    RunContext::new(SolverConfig::default()).with_label("test")
}

/// A round JSON with one space open 10:00-22:00 on Monday 2024-01-01 and the
/// given `(event id, basket purpose, min minutes, space id)` requests, all
/// asking for Monday 10:00-22:00.
pub fn monday_round_json(requests: &[(u64, &str, u32, Option<u64>)]) -> String {
    let events: Vec<String> = requests
        .iter()
        .map(|&(id, purpose, minutes, space)| {
            let space_ids = space.map(|s| s.to_string()).unwrap_or_default();
            format!(
                r#"{{
                    "id": {id},
                    "name": "Event {id}",
                    "purpose": "{purpose}",
                    "min_duration_minutes": {minutes},
                    "max_duration_minutes": {minutes},
                    "space_ids": [{spaces}],
                    "schedules": [
                        {{ "id": {id}, "weekday": "Mon", "begin": "10:00:00", "end": "22:00:00" }}
                    ]
                }}"#,
                spaces = space_ids
            )
        })
        .collect();
    format!(
        r#"{{
            "period": {{ "start": "2024-01-01", "end": "2024-01-01" }},
            "spaces": [{{ "id": 1, "name": "Hall" }}],
            "baskets": [
                {{ "id": 1, "name": "Sports", "order_number": 1, "purpose": "sports" }},
                {{ "id": 2, "name": "Culture", "order_number": 2, "purpose": "culture" }}
            ],
            "applications": [{{ "id": 1, "events": [{events}] }}]
        }}"#,
        events = events.join(", ")
    )
}

fn iv(start: Tick, end: Tick) -> ClosedOpenInterval<Tick> {
    ClosedOpenInterval::new(start, end)
}

/// A random two-week round with two spaces, two baskets and six events.
pub fn random_model(seed: u64) -> AllocationModel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let period = Period::try_new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
    )
    .unwrap();
    let mut b = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);

    for s in 1..=2u64 {
        let space = b.add_space(
            SpaceSpec::new(SpaceId(s), format!("Space {s}"))
                .with_max_persons(rng.random_range(10..40)),
        );
        for day in 0..14 {
            let open = rng.random_range(32..48);
            let close = open + rng.random_range(24..48);
            b.add_space_opening(space, iv(day * 96 + open, day * 96 + close));
        }
        b.set_space_daily_budget(space, Some(rng.random_range(16..40)));
    }
    b.add_basket(BasketSpec::new(BasketId(1), "First", 1));
    b.add_basket(BasketSpec::new(BasketId(2), "Second", 2));

    let weekdays = [Weekday::Mon, Weekday::Tue, Weekday::Wed];
    for e in 1..=6u64 {
        let duration: Tick = rng.random_range(4..12);
        let event = b.add_event(
            EventSpec::new(EventId(e), format!("Event {e}"), duration)
                .with_events_per_week(rng.random_range(1..=2))
                .with_num_persons(rng.random_range(5..30)),
        );
        for s in 1..=2u64 {
            if rng.random_bool(0.7) {
                b.add_event_space(event, SpaceId(s));
            }
        }
        for basket in 1..=2u64 {
            if rng.random_bool(0.5) {
                b.add_event_basket(event, BasketId(basket));
            }
        }
        for k in 0..2u64 {
            let weekday = weekdays[rng.random_range(0..weekdays.len())];
            let start: Tick = rng.random_range(32..50);
            let end = start + duration + rng.random_range(0..20);
            let first = weekday.num_days_from_monday();
            let days: Vec<u32> = if rng.random_bool(0.7) {
                vec![first, first + 7]
            } else {
                vec![first]
            };
            b.add_occurrence(
                event,
                OccurrenceSpec::new(OccurrenceId(e * 10 + k), weekday, iv(start, end)).with_days(days),
            );
        }
    }
    b.build().unwrap()
}
