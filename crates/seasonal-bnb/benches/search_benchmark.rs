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

use chrono::{NaiveDate, Weekday};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seasonal_bnb::bnb::BnbSolver;
use seasonal_bnb::branching::decision::DecisionBuilder;
use seasonal_bnb::branching::input_order::InputOrderBuilder;
use seasonal_bnb::branching::longest_first::LongestFirstBuilder;
use seasonal_bnb::branching::most_constrained::MostConstrainedBuilder;
use seasonal_bnb::eval::quota::QuotaBound;
use seasonal_bnb::monitor::no_op::NoOperationMonitor;
use seasonal_bnb::problem::ConstraintModel;
use seasonal_core::math::interval::ClosedOpenInterval;
use seasonal_model::id::{EventId, OccurrenceId, SpaceId};
use seasonal_model::index::EventIndex;
use seasonal_model::model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec};
use seasonal_model::time::{Period, TickResolution};
use std::hint::black_box;

const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// A four week season with `num_spaces` halls and `num_events` weekly requests.
fn build_problem(num_spaces: u64, num_events: u64, seed: u64) -> ConstraintModel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let period = Period::try_new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 28).unwrap(),
    )
    .unwrap();
    let mut b = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);

    for s in 0..num_spaces {
        let space = b.add_space(SpaceSpec::new(SpaceId(s + 1), format!("Hall {s}")));
        for day in 0..28 {
            b.add_space_opening(space, ClosedOpenInterval::new(day * 96 + 64, day * 96 + 88));
        }
        b.set_space_daily_budget(space, Some(20));
    }

    let mut next_occurrence = 1;
    for e in 0..num_events {
        let len = rng.random_range(4..=8);
        let event = b.add_event(
            EventSpec::new(EventId(e + 1), format!("Team {e}"), len)
                .with_events_per_week(rng.random_range(1..=2)),
        );
        for s in 0..num_spaces {
            if rng.random_bool(0.6) {
                b.add_event_space(event, SpaceId(s + 1));
            }
        }
        for _ in 0..2 {
            let weekday = rng.random_range(0..WEEKDAYS.len());
            let start = rng.random_range(64..76);
            let days = (0..4).map(|week| (week * 7 + weekday) as u32);
            b.add_occurrence(
                event,
                OccurrenceSpec::new(
                    OccurrenceId(next_occurrence),
                    WEEKDAYS[weekday],
                    ClosedOpenInterval::new(start, (start + len + 4).min(88)),
                )
                .with_days(days),
            );
            next_occurrence += 1;
        }
    }

    let model = b.build().expect("benchmark model must be valid");
    let events: Vec<EventIndex> = EventIndex::range(model.num_events()).collect();
    ConstraintModel::build(&model, &events)
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_benchmark");
    group.sample_size(20);

    for (num_spaces, num_events) in [(2, 8), (3, 12), (4, 16)] {
        let problem = build_problem(num_spaces, num_events, 42);
        group.throughput(Throughput::Elements(problem.num_nodes() as u64));

        let builders: Vec<Box<dyn DecisionBuilder>> = vec![
            Box::new(InputOrderBuilder::new()),
            Box::new(LongestFirstBuilder::new()),
            Box::new(MostConstrainedBuilder::new()),
        ];
        for mut builder in builders {
            let id = BenchmarkId::new(builder.name().to_string(), format!("{num_spaces}x{num_events}"));
            let mut solver = BnbSolver::preallocated(problem.num_nodes(), problem.num_vars());
            group.bench_with_input(id, &problem, |bencher, problem| {
                bencher.iter(|| {
                    let outcome = solver.solve(
                        black_box(problem),
                        &mut builder,
                        &mut QuotaBound::new(),
                        NoOperationMonitor::new(),
                    );
                    black_box(outcome.statistics().nodes_explored)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
