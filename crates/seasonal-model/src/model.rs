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
    basket::Basket,
    err::ModelError,
    event::{Event, Occurrence},
    id::{ApplicationId, BasketId, EventId, OccurrenceId, SpaceId},
    index::{BasketIndex, EventIndex, OccurrenceIndex, SpaceIndex},
    solution::AllocatedEvent,
    space::Space,
    time::{Period, Tick, TickResolution},
};
use chrono::Weekday;
use rustc_hash::FxHashMap;
use seasonal_core::math::{interval::ClosedOpenInterval, set};

/// The immutable snapshot the engine allocates against.
///
/// Entities live in dense arenas addressed by typed indices; cross
/// references (event to spaces, event to occurrences, occurrence to event,
/// event to baskets) are stored as indices into these arenas. A model is
/// only obtainable through `ModelBuilder::build`, which validates it.
#[derive(Clone)]
pub struct AllocationModel {
    period: Period,
    resolution: TickResolution,
    spaces: Vec<Space>,
    events: Vec<Event>,
    occurrences: Vec<Occurrence>,
    baskets: Vec<Basket>,
    space_lookup: FxHashMap<SpaceId, SpaceIndex>,
    event_lookup: FxHashMap<EventId, EventIndex>,
    occurrence_lookup: FxHashMap<OccurrenceId, OccurrenceIndex>,
    basket_lookup: FxHashMap<BasketId, BasketIndex>,
}

impl AllocationModel {
    #[inline]
    pub fn period(&self) -> &Period {
        &self.period
    }

    #[inline]
    pub fn resolution(&self) -> TickResolution {
        self.resolution
    }

    #[inline]
    pub fn ticks_per_day(&self) -> Tick {
        self.resolution.ticks_per_day()
    }

    #[inline]
    pub fn num_spaces(&self) -> usize {
        self.spaces.len()
    }

    #[inline]
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn num_occurrences(&self) -> usize {
        self.occurrences.len()
    }

    #[inline]
    pub fn num_baskets(&self) -> usize {
        self.baskets.len()
    }

    #[inline]
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[inline]
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    #[inline]
    pub fn baskets(&self) -> &[Basket] {
        &self.baskets
    }

    /// Returns the space at `space_index`.
    ///
    /// # Panics
    ///
    /// Panics if `space_index` is not in `0..num_spaces()`.
    #[inline]
    pub fn space(&self, space_index: SpaceIndex) -> &Space {
        let index = space_index.get();
        debug_assert!(
            index < self.num_spaces(),
            "called `AllocationModel::space` with space index out of bounds: the len is {} but the index is {}",
            self.num_spaces(),
            index
        );
        &self.spaces[index]
    }

    /// Returns the event at `event_index`.
    ///
    /// # Panics
    ///
    /// Panics if `event_index` is not in `0..num_events()`.
    #[inline]
    pub fn event(&self, event_index: EventIndex) -> &Event {
        let index = event_index.get();
        debug_assert!(
            index < self.num_events(),
            "called `AllocationModel::event` with event index out of bounds: the len is {} but the index is {}",
            self.num_events(),
            index
        );
        &self.events[index]
    }

    /// Returns the occurrence at `occurrence_index`.
    ///
    /// # Panics
    ///
    /// Panics if `occurrence_index` is not in `0..num_occurrences()`.
    #[inline]
    pub fn occurrence(&self, occurrence_index: OccurrenceIndex) -> &Occurrence {
        let index = occurrence_index.get();
        debug_assert!(
            index < self.num_occurrences(),
            "called `AllocationModel::occurrence` with occurrence index out of bounds: the len is {} but the index is {}",
            self.num_occurrences(),
            index
        );
        &self.occurrences[index]
    }

    /// Returns the basket at `basket_index`.
    ///
    /// # Panics
    ///
    /// Panics if `basket_index` is not in `0..num_baskets()`.
    #[inline]
    pub fn basket(&self, basket_index: BasketIndex) -> &Basket {
        let index = basket_index.get();
        debug_assert!(
            index < self.num_baskets(),
            "called `AllocationModel::basket` with basket index out of bounds: the len is {} but the index is {}",
            self.num_baskets(),
            index
        );
        &self.baskets[index]
    }

    #[inline]
    pub fn space_index(&self, id: SpaceId) -> Option<SpaceIndex> {
        self.space_lookup.get(&id).copied()
    }

    #[inline]
    pub fn event_index(&self, id: EventId) -> Option<EventIndex> {
        self.event_lookup.get(&id).copied()
    }

    #[inline]
    pub fn occurrence_index(&self, id: OccurrenceId) -> Option<OccurrenceIndex> {
        self.occurrence_lookup.get(&id).copied()
    }

    #[inline]
    pub fn basket_index(&self, id: BasketId) -> Option<BasketIndex> {
        self.basket_lookup.get(&id).copied()
    }

    /// All basket indices in tier order (see `Basket::priority_key`).
    pub fn baskets_by_priority(&self) -> Vec<BasketIndex> {
        let mut order: Vec<BasketIndex> = BasketIndex::range(self.num_baskets()).collect();
        order.sort_by_key(|&b| self.basket(b).priority_key());
        order
    }

    /// The highest-priority basket of `event_index`, or `None` if it belongs to no basket.
    pub fn primary_basket(&self, event_index: EventIndex) -> Option<BasketIndex> {
        self.event(event_index)
            .baskets()
            .iter()
            .copied()
            .min_by_key(|&b| self.basket(b).priority_key())
    }

    /// Returns a copy of the model with the capacity taken by `allocated` removed.
    ///
    /// Every granted slot is cut out of the space's availability on each of
    /// its dates, and its duration is charged to those days' capacity
    /// budgets. Events, occurrences and baskets are carried over unchanged,
    /// so indices stay valid across the copy.
    pub fn with_consumed(&self, allocated: &[AllocatedEvent]) -> AllocationModel {
        let mut reduced = self.clone();
        let ticks_per_day = self.ticks_per_day();
        for grant in allocated {
            let occurrence = self.occurrence(grant.occurrence());
            let space = &mut reduced.spaces[grant.space().get()];
            for &day in occurrence.days() {
                space.consume(day, grant.slot(), grant.duration(), ticks_per_day);
            }
        }
        reduced
    }
}

impl std::fmt::Debug for AllocationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllocationModel")
            .field("period", &self.period)
            .field("resolution", &self.resolution)
            .field("spaces", &self.spaces)
            .field("events", &self.events)
            .field("occurrences", &self.occurrences)
            .field("baskets", &self.baskets)
            .finish()
    }
}

impl std::fmt::Display for AllocationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AllocationModel(period: {}, spaces: {}, events: {}, occurrences: {}, baskets: {})",
            self.period,
            self.num_spaces(),
            self.num_events(),
            self.num_occurrences(),
            self.num_baskets()
        )
    }
}

/// Builder input describing a space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpaceSpec {
    pub id: SpaceId,
    pub name: String,
    pub max_persons: Option<u32>,
}

impl SpaceSpec {
    pub fn new(id: SpaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            max_persons: None,
        }
    }

    pub fn with_max_persons(mut self, max_persons: u32) -> Self {
        self.max_persons = Some(max_persons);
        self
    }
}

/// Builder input describing an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSpec {
    pub id: EventId,
    pub name: String,
    pub application: Option<ApplicationId>,
    pub min_duration: Tick,
    pub max_duration: Tick,
    pub events_per_week: u32,
    pub num_persons: Option<u32>,
}

impl EventSpec {
    /// An event with a fixed duration of `duration` ticks, granted at most once per week.
    pub fn new(id: EventId, name: impl Into<String>, duration: Tick) -> Self {
        Self {
            id,
            name: name.into(),
            application: None,
            min_duration: duration,
            max_duration: duration,
            events_per_week: 1,
            num_persons: None,
        }
    }

    pub fn with_durations(mut self, min_duration: Tick, max_duration: Tick) -> Self {
        self.min_duration = min_duration;
        self.max_duration = max_duration;
        self
    }

    pub fn with_events_per_week(mut self, events_per_week: u32) -> Self {
        self.events_per_week = events_per_week;
        self
    }

    pub fn with_num_persons(mut self, num_persons: u32) -> Self {
        self.num_persons = Some(num_persons);
        self
    }

    pub fn with_application(mut self, application: ApplicationId) -> Self {
        self.application = Some(application);
        self
    }
}

/// Builder input describing one weekly slot of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccurrenceSpec {
    pub id: OccurrenceId,
    pub weekday: Weekday,
    pub window: ClosedOpenInterval<Tick>,
    pub days: Vec<u32>,
}

impl OccurrenceSpec {
    pub fn new(id: OccurrenceId, weekday: Weekday, window: ClosedOpenInterval<Tick>) -> Self {
        Self {
            id,
            weekday,
            window,
            days: Vec::new(),
        }
    }

    pub fn with_days(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.days.extend(days);
        self
    }
}

/// Builder input describing a basket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasketSpec {
    pub id: BasketId,
    pub name: String,
    pub order_number: u32,
    pub allocation_percentage: u8,
}

impl BasketSpec {
    pub fn new(id: BasketId, name: impl Into<String>, order_number: u32) -> Self {
        Self {
            id,
            name: name.into(),
            order_number,
            allocation_percentage: 100,
        }
    }

    pub fn with_allocation_percentage(mut self, allocation_percentage: u8) -> Self {
        self.allocation_percentage = allocation_percentage;
        self
    }
}

#[derive(Clone, Debug)]
struct PendingSpace {
    spec: SpaceSpec,
    opening: rangemap::RangeSet<Tick>,
    daily_budget: Option<Tick>,
}

#[derive(Clone, Debug)]
struct PendingEvent {
    spec: EventSpec,
    spaces: Vec<SpaceId>,
    baskets: Vec<BasketId>,
    occurrences: Vec<OccurrenceIndex>,
}

#[derive(Clone, Debug)]
struct PendingOccurrence {
    event: EventIndex,
    spec: OccurrenceSpec,
}

/// Mutable, validating constructor of `AllocationModel`.
///
/// Spaces start with no availability; openings are added (and closings
/// removed) in period ticks. Events reference spaces and baskets by their
/// external ids so that dangling references surface as `ModelError`s when
/// the model is built instead of as panics while it is assembled.
///
/// # Examples
///
/// ```rust
/// use chrono::{NaiveDate, Weekday};
/// use seasonal_core::math::interval::ClosedOpenInterval;
/// use seasonal_model::id::{EventId, OccurrenceId, SpaceId};
/// use seasonal_model::model::{EventSpec, ModelBuilder, OccurrenceSpec, SpaceSpec};
/// use seasonal_model::time::{Period, TickResolution};
///
/// let period = Period::try_new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
/// ).unwrap();
/// let mut builder = ModelBuilder::new(period, TickResolution::QUARTER_HOUR);
/// let hall = builder.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
/// builder.add_space_opening(hall, ClosedOpenInterval::new(40, 88));
///
/// let training = builder.add_event(EventSpec::new(EventId(7), "Training", 8));
/// builder.add_event_space(training, SpaceId(1));
/// builder.add_occurrence(
///     training,
///     OccurrenceSpec::new(OccurrenceId(70), Weekday::Mon, ClosedOpenInterval::new(40, 60)).with_days([0, 7]),
/// );
///
/// let model = builder.build().unwrap();
/// assert_eq!(model.num_occurrences(), 1);
/// assert_eq!(model.space(hall).capacity_on(0), 48);
/// assert_eq!(model.space(hall).capacity_on(1), 0);
/// ```
#[derive(Clone, Debug)]
pub struct ModelBuilder {
    period: Period,
    resolution: TickResolution,
    spaces: Vec<PendingSpace>,
    events: Vec<PendingEvent>,
    occurrences: Vec<PendingOccurrence>,
    baskets: Vec<BasketSpec>,
}

impl ModelBuilder {
    pub fn new(period: Period, resolution: TickResolution) -> Self {
        Self {
            period,
            resolution,
            spaces: Vec::new(),
            events: Vec::new(),
            occurrences: Vec::new(),
            baskets: Vec::new(),
        }
    }

    #[inline]
    pub fn period(&self) -> &Period {
        &self.period
    }

    #[inline]
    pub fn resolution(&self) -> TickResolution {
        self.resolution
    }

    #[inline]
    pub fn num_spaces(&self) -> usize {
        self.spaces.len()
    }

    #[inline]
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    pub fn add_space(&mut self, spec: SpaceSpec) -> SpaceIndex {
        let index = SpaceIndex::new(self.spaces.len());
        self.spaces.push(PendingSpace {
            spec,
            opening: rangemap::RangeSet::new(),
            daily_budget: None,
        });
        index
    }

    /// Marks `window` (period ticks) as open. Overlapping or touching openings merge.
    ///
    /// # Panics
    ///
    /// Panics if `space_index` is not in `0..num_spaces()`.
    pub fn add_space_opening(
        &mut self,
        space_index: SpaceIndex,
        window: ClosedOpenInterval<Tick>,
    ) -> &mut Self {
        let index = space_index.get();
        debug_assert!(
            index < self.num_spaces(),
            "called `ModelBuilder::add_space_opening` with space index out of bounds: the len is {} but the index is {}",
            self.num_spaces(),
            index
        );
        if !window.is_empty() {
            self.spaces[index].opening.insert(window.into());
        }
        self
    }

    /// Removes `window` (period ticks) from the space's openings.
    ///
    /// # Panics
    ///
    /// Panics if `space_index` is not in `0..num_spaces()`.
    pub fn add_space_closing(
        &mut self,
        space_index: SpaceIndex,
        window: ClosedOpenInterval<Tick>,
    ) -> &mut Self {
        let index = space_index.get();
        debug_assert!(
            index < self.num_spaces(),
            "called `ModelBuilder::add_space_closing` with space index out of bounds: the len is {} but the index is {}",
            self.num_spaces(),
            index
        );
        if !window.is_empty() {
            self.spaces[index].opening.remove(window.into());
        }
        self
    }

    /// Caps the ticks that may be granted in the space on any single day.
    ///
    /// Without a cap, a day's budget equals its open ticks.
    ///
    /// # Panics
    ///
    /// Panics if `space_index` is not in `0..num_spaces()`.
    pub fn set_space_daily_budget(
        &mut self,
        space_index: SpaceIndex,
        budget: Option<Tick>,
    ) -> &mut Self {
        let index = space_index.get();
        debug_assert!(
            index < self.num_spaces(),
            "called `ModelBuilder::set_space_daily_budget` with space index out of bounds: the len is {} but the index is {}",
            self.num_spaces(),
            index
        );
        self.spaces[index].daily_budget = budget.map(|b| b.max(0));
        self
    }

    pub fn add_event(&mut self, spec: EventSpec) -> EventIndex {
        let index = EventIndex::new(self.events.len());
        self.events.push(PendingEvent {
            spec,
            spaces: Vec::new(),
            baskets: Vec::new(),
            occurrences: Vec::new(),
        });
        index
    }

    /// Declares `space` eligible for the event. Unknown ids are reported by `build`.
    ///
    /// # Panics
    ///
    /// Panics if `event_index` is not in `0..num_events()`.
    pub fn add_event_space(&mut self, event_index: EventIndex, space: SpaceId) -> &mut Self {
        let index = event_index.get();
        debug_assert!(
            index < self.num_events(),
            "called `ModelBuilder::add_event_space` with event index out of bounds: the len is {} but the index is {}",
            self.num_events(),
            index
        );
        let spaces = &mut self.events[index].spaces;
        if !spaces.contains(&space) {
            spaces.push(space);
        }
        self
    }

    /// Adds the event to `basket`. Unknown ids are reported by `build`.
    ///
    /// # Panics
    ///
    /// Panics if `event_index` is not in `0..num_events()`.
    pub fn add_event_basket(&mut self, event_index: EventIndex, basket: BasketId) -> &mut Self {
        let index = event_index.get();
        debug_assert!(
            index < self.num_events(),
            "called `ModelBuilder::add_event_basket` with event index out of bounds: the len is {} but the index is {}",
            self.num_events(),
            index
        );
        let baskets = &mut self.events[index].baskets;
        if !baskets.contains(&basket) {
            baskets.push(basket);
        }
        self
    }

    /// Adds a weekly slot to the event.
    ///
    /// # Panics
    ///
    /// Panics if `event_index` is not in `0..num_events()`.
    pub fn add_occurrence(&mut self, event_index: EventIndex, spec: OccurrenceSpec) -> OccurrenceIndex {
        let index = event_index.get();
        debug_assert!(
            index < self.num_events(),
            "called `ModelBuilder::add_occurrence` with event index out of bounds: the len is {} but the index is {}",
            self.num_events(),
            index
        );
        let occurrence_index = OccurrenceIndex::new(self.occurrences.len());
        self.occurrences.push(PendingOccurrence {
            event: event_index,
            spec,
        });
        self.events[index].occurrences.push(occurrence_index);
        occurrence_index
    }

    pub fn add_basket(&mut self, spec: BasketSpec) -> BasketIndex {
        let index = BasketIndex::new(self.baskets.len());
        self.baskets.push(spec);
        index
    }

    /// Validates the collected input and freezes it into an `AllocationModel`.
    pub fn build(self) -> Result<AllocationModel, ModelError> {
        let num_days = self.period.num_days();
        let ticks_per_day = self.resolution.ticks_per_day();
        let horizon = Tick::from(num_days) * ticks_per_day;

        let mut space_lookup = FxHashMap::default();
        let mut spaces = Vec::with_capacity(self.spaces.len());
        for (i, pending) in self.spaces.into_iter().enumerate() {
            let id = pending.spec.id;
            if space_lookup.insert(id, SpaceIndex::new(i)).is_some() {
                return Err(ModelError::DuplicateSpace { space: id });
            }

            let availability: Vec<ClosedOpenInterval<Tick>> =
                pending.opening.into_iter().map(|r| r.into()).collect();
            let outside = availability
                .iter()
                .find(|window| window.start() < 0 || window.end() > horizon);
            if let Some(window) = outside {
                return Err(ModelError::SpaceWindowOutOfRange {
                    space: id,
                    start: window.start(),
                    end: window.end(),
                });
            }

            let daily_capacity = (0..num_days)
                .map(|day| {
                    let offset = Tick::from(day) * ticks_per_day;
                    let open = set::total_len(&set::clip(
                        &availability,
                        ClosedOpenInterval::new(offset, offset + ticks_per_day),
                    ));
                    pending.daily_budget.map_or(open, |budget| budget.min(open))
                })
                .collect();

            spaces.push(Space::new(
                id,
                pending.spec.name,
                pending.spec.max_persons,
                availability,
                daily_capacity,
            ));
        }

        let mut basket_lookup = FxHashMap::default();
        let mut baskets = Vec::with_capacity(self.baskets.len());
        for (i, spec) in self.baskets.into_iter().enumerate() {
            if basket_lookup.insert(spec.id, BasketIndex::new(i)).is_some() {
                return Err(ModelError::DuplicateBasket { basket: spec.id });
            }
            if spec.allocation_percentage > 100 {
                return Err(ModelError::InvalidAllocationPercentage {
                    basket: spec.id,
                    percentage: spec.allocation_percentage,
                });
            }
            baskets.push(Basket {
                id: spec.id,
                name: spec.name,
                order_number: spec.order_number,
                allocation_percentage: spec.allocation_percentage,
            });
        }

        let mut event_lookup = FxHashMap::default();
        let mut events = Vec::with_capacity(self.events.len());
        for (i, pending) in self.events.into_iter().enumerate() {
            let spec = pending.spec;
            if event_lookup.insert(spec.id, EventIndex::new(i)).is_some() {
                return Err(ModelError::DuplicateEvent { event: spec.id });
            }
            if spec.min_duration <= 0 {
                return Err(ModelError::InvalidDuration {
                    event: spec.id,
                    min: spec.min_duration,
                });
            }
            if spec.min_duration > spec.max_duration {
                return Err(ModelError::DurationRange {
                    event: spec.id,
                    min: spec.min_duration,
                    max: spec.max_duration,
                });
            }

            let eligible_spaces = pending
                .spaces
                .iter()
                .map(|&space| {
                    space_lookup
                        .get(&space)
                        .copied()
                        .ok_or(ModelError::UnknownSpace {
                            event: spec.id,
                            space,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let event_baskets = pending
                .baskets
                .iter()
                .map(|&basket| {
                    basket_lookup
                        .get(&basket)
                        .copied()
                        .ok_or(ModelError::UnknownBasket { basket })
                })
                .collect::<Result<Vec<_>, _>>()?;

            events.push(Event {
                id: spec.id,
                name: spec.name,
                application: spec.application,
                eligible_spaces,
                occurrences: pending.occurrences,
                min_duration: spec.min_duration,
                max_duration: spec.max_duration,
                events_per_week: spec.events_per_week,
                num_persons: spec.num_persons,
                baskets: event_baskets,
            });
        }

        let mut occurrence_lookup = FxHashMap::default();
        let mut occurrences = Vec::with_capacity(self.occurrences.len());
        for (i, pending) in self.occurrences.into_iter().enumerate() {
            let event = &events[pending.event.get()];
            let spec = pending.spec;
            if occurrence_lookup
                .insert(spec.id, OccurrenceIndex::new(i))
                .is_some()
            {
                return Err(ModelError::DuplicateOccurrence { occurrence: spec.id });
            }

            let window = spec.window;
            if window.start() < 0 || window.end() > ticks_per_day {
                return Err(ModelError::OccurrenceWindowOutOfDay {
                    event: event.id,
                    occurrence: spec.id,
                    start: window.start(),
                    end: window.end(),
                });
            }
            if window.len() < event.min_duration {
                return Err(ModelError::OccurrenceWindowTooShort {
                    event: event.id,
                    occurrence: spec.id,
                    window: window.len(),
                    min: event.min_duration,
                });
            }

            let mut days = spec.days;
            days.sort_unstable();
            days.dedup();
            for &day in &days {
                let Some(date) = self.period.date(day) else {
                    return Err(ModelError::OccurrenceDayOutOfRange {
                        occurrence: spec.id,
                        day,
                        num_days,
                    });
                };
                let actual = self.period.weekday(day);
                if actual != spec.weekday {
                    return Err(ModelError::OccurrenceWeekdayMismatch {
                        occurrence: spec.id,
                        date,
                        expected: spec.weekday,
                        actual,
                    });
                }
            }

            occurrences.push(Occurrence {
                id: spec.id,
                event: pending.event,
                weekday: spec.weekday,
                window,
                days,
            });
        }

        Ok(AllocationModel {
            period: self.period,
            resolution: self.resolution,
            spaces,
            events,
            occurrences,
            baskets,
            space_lookup,
            event_lookup,
            occurrence_lookup,
            basket_lookup,
        })
    }
}

impl std::fmt::Display for ModelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ModelBuilder(period: {}, spaces: {}, events: {}, occurrences: {}, baskets: {})",
            self.period,
            self.spaces.len(),
            self.events.len(),
            self.occurrences.len(),
            self.baskets.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    type IntegerType = Tick;

    fn iv(start: IntegerType, end: IntegerType) -> ClosedOpenInterval<IntegerType> {
        ClosedOpenInterval::new(start, end)
    }

    // 2024-01-01 is a Monday; two weeks at quarter-hour resolution.
    fn builder() -> ModelBuilder {
        let period = Period::try_new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
        )
        .unwrap();
        ModelBuilder::new(period, TickResolution::QUARTER_HOUR)
    }

    fn open_every_day(builder: &mut ModelBuilder, space: SpaceIndex) {
        for day in 0..14 {
            let offset = day * 96;
            builder.add_space_opening(space, iv(offset + 40, offset + 88));
        }
    }

    #[test]
    fn test_build_resolves_references() {
        let mut b = builder();
        let hall = b.add_space(SpaceSpec::new(SpaceId(10), "Hall").with_max_persons(40));
        open_every_day(&mut b, hall);
        let youth = b.add_basket(BasketSpec::new(BasketId(1), "Youth", 1));
        let adults = b.add_basket(BasketSpec::new(BasketId(2), "Adults", 2));

        let e = b.add_event(EventSpec::new(EventId(5), "Football", 8).with_events_per_week(2));
        b.add_event_space(e, SpaceId(10))
            .add_event_basket(e, BasketId(2))
            .add_event_basket(e, BasketId(1));
        let o = b.add_occurrence(
            e,
            OccurrenceSpec::new(OccurrenceId(50), Weekday::Wed, iv(64, 80)).with_days([9, 2]),
        );

        let model = b.build().unwrap();
        assert_eq!(model.num_spaces(), 1);
        assert_eq!(model.event(e).eligible_spaces(), &[hall]);
        assert_eq!(model.event(e).occurrences(), &[o]);
        assert_eq!(model.occurrence(o).days(), &[2, 9]);
        assert_eq!(model.occurrence(o).event(), e);
        assert_eq!(model.primary_basket(e), Some(youth));
        assert_eq!(model.baskets_by_priority(), vec![youth, adults]);
        assert_eq!(model.space_index(SpaceId(10)), Some(hall));
        assert_eq!(model.event_index(EventId(5)), Some(e));
        assert_eq!(model.occurrence_index(OccurrenceId(50)), Some(o));
        assert_eq!(model.space(hall).capacity_on(3), 48);
    }

    #[test]
    fn test_unknown_space_is_a_configuration_error() {
        let mut b = builder();
        b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        let e = b.add_event(EventSpec::new(EventId(5), "Football", 8));
        b.add_event_space(e, SpaceId(99));
        assert_eq!(
            b.build().unwrap_err(),
            ModelError::UnknownSpace {
                event: EventId(5),
                space: SpaceId(99)
            }
        );
    }

    #[test]
    fn test_duration_validation() {
        let mut b = builder();
        b.add_event(EventSpec::new(EventId(1), "Broken", 8).with_durations(10, 8));
        assert!(matches!(b.build(), Err(ModelError::DurationRange { min: 10, max: 8, .. })));

        let mut b = builder();
        b.add_event(EventSpec::new(EventId(1), "Broken", 0));
        assert!(matches!(b.build(), Err(ModelError::InvalidDuration { .. })));
    }

    #[test]
    fn test_window_shorter_than_min_duration_is_rejected() {
        let mut b = builder();
        let e = b.add_event(EventSpec::new(EventId(1), "Long", 8));
        b.add_occurrence(e, OccurrenceSpec::new(OccurrenceId(1), Weekday::Mon, iv(40, 46)));
        assert!(matches!(
            b.build(),
            Err(ModelError::OccurrenceWindowTooShort { window: 6, min: 8, .. })
        ));
    }

    #[test]
    fn test_occurrence_day_validation() {
        let mut b = builder();
        let e = b.add_event(EventSpec::new(EventId(1), "Swim", 4));
        b.add_occurrence(
            e,
            OccurrenceSpec::new(OccurrenceId(1), Weekday::Mon, iv(40, 60)).with_days([1]),
        );
        assert!(matches!(
            b.build(),
            Err(ModelError::OccurrenceWeekdayMismatch {
                expected: Weekday::Mon,
                actual: Weekday::Tue,
                ..
            })
        ));

        let mut b = builder();
        let e = b.add_event(EventSpec::new(EventId(1), "Swim", 4));
        b.add_occurrence(
            e,
            OccurrenceSpec::new(OccurrenceId(1), Weekday::Mon, iv(40, 60)).with_days([14]),
        );
        assert!(matches!(b.build(), Err(ModelError::OccurrenceDayOutOfRange { day: 14, .. })));
    }

    #[test]
    fn test_duplicates_and_ranges_are_rejected() {
        let mut b = builder();
        b.add_space(SpaceSpec::new(SpaceId(1), "A"));
        b.add_space(SpaceSpec::new(SpaceId(1), "B"));
        assert!(matches!(b.build(), Err(ModelError::DuplicateSpace { .. })));

        let mut b = builder();
        let s = b.add_space(SpaceSpec::new(SpaceId(1), "A"));
        b.add_space_opening(s, iv(14 * 96 - 4, 14 * 96 + 4));
        assert!(matches!(b.build(), Err(ModelError::SpaceWindowOutOfRange { .. })));

        let mut b = builder();
        b.add_basket(BasketSpec::new(BasketId(1), "Over", 1).with_allocation_percentage(101));
        assert!(matches!(b.build(), Err(ModelError::InvalidAllocationPercentage { .. })));
    }

    #[test]
    fn test_daily_budget_caps_open_ticks() {
        let mut b = builder();
        let s = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        open_every_day(&mut b, s);
        b.add_space_closing(s, iv(96 + 40, 96 + 60));
        b.set_space_daily_budget(s, Some(40));
        let model = b.build().unwrap();
        assert_eq!(model.space(s).capacity_on(0), 40);
        assert_eq!(model.space(s).capacity_on(1), 28);
        assert_eq!(model.space(s).open_windows_on(1, 96), vec![iv(60, 88)]);
    }

    #[test]
    fn test_with_consumed_reduces_every_date() {
        let mut b = builder();
        let s = b.add_space(SpaceSpec::new(SpaceId(1), "Hall"));
        open_every_day(&mut b, s);
        let e = b.add_event(EventSpec::new(EventId(1), "Yoga", 8));
        b.add_event_space(e, SpaceId(1));
        let o = b.add_occurrence(
            e,
            OccurrenceSpec::new(OccurrenceId(1), Weekday::Mon, iv(40, 88)).with_days([0, 7]),
        );
        let model = b.build().unwrap();

        let grant = AllocatedEvent::new(&model, s, o, 48, None);
        let reduced = model.with_consumed(std::slice::from_ref(&grant));

        for day in [0, 7] {
            assert_eq!(reduced.space(s).open_windows_on(day, 96), vec![iv(40, 48), iv(56, 88)]);
            assert_eq!(reduced.space(s).capacity_on(day), 40);
        }
        assert_eq!(reduced.space(s).capacity_on(1), 48);
        assert_eq!(model.space(s).capacity_on(0), 48);
    }
}
