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

//! # Basket Tiering
//!
//! An allocation run solves one tier per basket, in tier order, and lets
//! each tier see only the capacity the tiers before it left over:
//!
//! ```text
//! for tier in tiers:
//!     model' = model.with_consumed(granted so far)
//!     granted += solve(model', tier)
//! ```
//!
//! An event belongs to the tier of its highest-priority basket. Events
//! without any basket form a final tier when the configuration asks for it.
//! If the snapshot restricts the reported baskets, tiers after the last
//! reported basket are never solved; tiers before it are solved and consume
//! capacity, but only the reported tiers' grants are returned.
//!
//! Each tier gets an equal share of the time that is left when it starts,
//! so a tier that cannot prove its optimum does not starve the later ones.

use crate::{
    context::RunContext,
    error::AllocationError,
    extract::{extract_allocations, sort_allocations},
    portfolio::{Portfolio, SolveStatus},
    report::{AllocationReport, TierReport},
};
use seasonal_bnb::problem::ConstraintModel;
use seasonal_model::{
    index::{BasketIndex, EventIndex},
    model::AllocationModel,
    snapshot::{RoundSnapshot, SnapshotBuilder, config::SnapshotConfig, records::RoundRecord},
    solution::AllocatedEvent,
};

/// The events solved together in one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tier {
    basket: Option<BasketIndex>,
    events: Vec<EventIndex>,
    reported: bool,
}

impl Tier {
    /// The basket of the tier, `None` for unbasketed events.
    #[inline]
    pub fn basket(&self) -> Option<BasketIndex> {
        self.basket
    }

    #[inline]
    pub fn events(&self) -> &[EventIndex] {
        &self.events
    }

    /// Whether the tier's grants are part of the returned allocation.
    #[inline]
    pub fn is_reported(&self) -> bool {
        self.reported
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.basket {
            Some(basket) => write!(f, "{}", basket)?,
            None => f.write_str("unbasketed")?,
        }
        write!(f, " ({} events)", self.events.len())
    }
}

/// Splits the events of `model` into tiers, in solving order.
///
/// Baskets without events produce no tier.
pub fn plan_tiers(
    model: &AllocationModel,
    output_baskets: Option<&[BasketIndex]>,
    include_unbasketed: bool,
) -> Vec<Tier> {
    let priority = model.baskets_by_priority();
    let mut rank = vec![0usize; model.num_baskets()];
    for (position, basket) in priority.iter().enumerate() {
        rank[basket.get()] = position;
    }

    let mut per_basket: Vec<Vec<EventIndex>> = vec![Vec::new(); priority.len()];
    let mut unbasketed = Vec::new();
    for event in EventIndex::range(model.num_events()) {
        match model.primary_basket(event) {
            Some(basket) => per_basket[rank[basket.get()]].push(event),
            None => unbasketed.push(event),
        }
    }

    // With an output filter, nothing after the last reported basket is needed.
    let last_needed = match output_baskets {
        Some(outputs) => outputs.iter().map(|b| rank[b.get()]).max(),
        None => priority.len().checked_sub(1),
    };
    let is_reported =
        |basket: BasketIndex| output_baskets.is_none_or(|outputs| outputs.contains(&basket));

    let mut tiers: Vec<Tier> = priority
        .iter()
        .zip(per_basket)
        .enumerate()
        .take_while(|(position, _)| last_needed.is_some_and(|last| *position <= last))
        .filter(|(_, (_, events))| !events.is_empty())
        .map(|(_, (&basket, events))| Tier {
            basket: Some(basket),
            events,
            reported: is_reported(basket),
        })
        .collect();

    if include_unbasketed && output_baskets.is_none() && !unbasketed.is_empty() {
        tiers.push(Tier {
            basket: None,
            events: unbasketed,
            reported: true,
        });
    }
    tiers
}

/// Runs the tiered allocation of `snapshot`.
///
/// Infeasible or timed out tiers are reported in the returned
/// `AllocationReport`; only invalid configuration is an error.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(
        run = %ctx.label(),
        spaces = snapshot.model().num_spaces(),
        events = snapshot.model().num_events(),
    )
)]
pub fn allocate(snapshot: &RoundSnapshot, ctx: &RunContext) -> Result<AllocationReport, AllocationError> {
    ctx.config().validate()?;
    let original = snapshot.model();
    let tiers = plan_tiers(
        original,
        snapshot.output_baskets(),
        ctx.config().include_unbasketed,
    );
    tracing::debug!(tiers = tiers.len(), config = %ctx.config(), "tiers planned");

    let mut report = AllocationReport::default();
    let mut reduced: Option<AllocationModel> = None;

    for (position, tier) in tiers.iter().enumerate() {
        let model = reduced.as_ref().unwrap_or(original);
        let tier_ctx = ctx.share(tiers.len() - position);
        let (tier_report, granted) = solve_tier(model, tier, &tier_ctx);
        if tier.reported {
            report.allocated.extend(granted.iter().cloned());
        }
        report.tiers.push(tier_report);
        if !granted.is_empty() {
            reduced = Some(model.with_consumed(&granted));
        }
    }

    sort_allocations(&mut report.allocated);
    tracing::info!(
        tiers = report.tiers.len(),
        allocated = report.allocated.len(),
        granted_ticks = report.granted_ticks(),
        complete = report.is_complete(),
        "allocation finished"
    );
    Ok(report)
}

/// Builds the snapshot of `round` and allocates it.
pub fn allocate_round(
    round: &RoundRecord,
    snapshot_config: SnapshotConfig,
    ctx: &RunContext,
) -> Result<AllocationReport, AllocationError> {
    let snapshot = SnapshotBuilder::new(snapshot_config).build(round)?;
    allocate(&snapshot, ctx)
}

/// Parses a JSON round record and allocates it.
pub fn allocate_json(
    round_json: &str,
    snapshot_config: SnapshotConfig,
    ctx: &RunContext,
) -> Result<AllocationReport, AllocationError> {
    let round: RoundRecord = serde_json::from_str(round_json)?;
    allocate_round(&round, snapshot_config, ctx)
}

#[tracing::instrument(level = "info", skip_all, fields(tier = %tier))]
fn solve_tier(model: &AllocationModel, tier: &Tier, ctx: &RunContext) -> (TierReport, Vec<AllocatedEvent>) {
    let problem = ConstraintModel::build(model, &tier.events);
    warn_unallocatable(model, &problem, &tier.events);

    let outcome = Portfolio::solve_once(&problem, ctx);
    let granted = match outcome.solution() {
        Some(solution) => extract_allocations(model, &problem, solution, tier.basket),
        None => Vec::new(),
    };
    if outcome.status() == SolveStatus::Timeout {
        tracing::warn!("tier stopped before any solution was found");
    }

    let basket = tier.basket.map(|b| model.basket(b));
    let report = TierReport {
        basket: basket.map(|b| b.id()),
        basket_name: basket.map(|b| b.name().to_string()),
        status: outcome.status(),
        num_events: tier.events.len(),
        num_variables: problem.num_vars(),
        num_allocated: granted.len(),
        granted_ticks: granted.iter().map(AllocatedEvent::duration).sum(),
        granted_minutes: granted
            .iter()
            .map(|a| u64::from(a.end_minute().saturating_sub(a.begin_minute())))
            .sum(),
        reported: tier.reported,
        nodes_explored: outcome.nodes_explored(),
        elapsed: outcome.elapsed(),
    };
    tracing::info!(
        status = %report.status,
        allocated = report.num_allocated,
        granted_minutes = report.granted_minutes,
        nodes = report.nodes_explored,
        elapsed = ?report.elapsed,
        "tier solved"
    );
    (report, granted)
}

fn warn_unallocatable(model: &AllocationModel, problem: &ConstraintModel, events: &[EventIndex]) {
    let mut has_candidate = vec![false; model.num_events()];
    for var in problem.vars() {
        has_candidate[var.event().get()] = true;
    }
    for &event_index in events {
        if !has_candidate[event_index.get()] {
            let event = model.event(event_index);
            tracing::warn!(
                event_id = %event.id(),
                event_name = event.name(),
                "no space and time can host the event, it cannot be allocated"
            );
        }
    }
}
