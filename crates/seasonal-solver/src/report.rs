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

use crate::portfolio::SolveStatus;
use seasonal_model::{id::BasketId, solution::AllocatedEvent, time::Tick};
use serde::Serialize;
use std::time::Duration;

/// Summary of one solved tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TierReport {
    /// The basket of the tier, `None` for the unbasketed tier.
    pub basket: Option<BasketId>,
    pub basket_name: Option<String>,
    pub status: SolveStatus,
    /// Events assigned to this tier.
    pub num_events: usize,
    /// Selection variables left after pruning.
    pub num_variables: usize,
    /// Occurrences granted by the tier, reported or not.
    pub num_allocated: usize,
    /// Granted time in ticks.
    pub granted_ticks: Tick,
    pub granted_minutes: u64,
    /// Whether the tier's grants appear in `AllocationReport::allocated`.
    pub reported: bool,
    pub nodes_explored: u64,
    pub elapsed: Duration,
}

impl std::fmt::Display for TierReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.basket {
            Some(basket) => write!(f, "Tier({}", basket)?,
            None => f.write_str("Tier(unbasketed")?,
        }
        write!(
            f,
            ": {}, {} of {} events, {} min)",
            self.status, self.num_allocated, self.num_events, self.granted_minutes
        )
    }
}

/// The result of a whole allocation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    pub tiers: Vec<TierReport>,
    /// Granted occurrences of the reported tiers, in reporting order.
    pub allocated: Vec<AllocatedEvent>,
}

impl AllocationReport {
    /// Total granted time of the reported allocations, in ticks.
    pub fn granted_ticks(&self) -> Tick {
        self.allocated.iter().map(AllocatedEvent::duration).sum()
    }

    /// True if every tier was searched to optimality (or proven infeasible).
    pub fn is_complete(&self) -> bool {
        self.tiers
            .iter()
            .all(|t| matches!(t.status, SolveStatus::Optimal | SolveStatus::Infeasible))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for AllocationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Allocation Report:")?;
        for tier in &self.tiers {
            writeln!(f, "  {}", tier)?;
        }
        write!(f, "  allocated: {}", self.allocated.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(status: SolveStatus) -> TierReport {
        TierReport {
            basket: Some(BasketId(3)),
            basket_name: Some(String::from("Clubs")),
            status,
            num_events: 4,
            num_variables: 9,
            num_allocated: 2,
            granted_ticks: 16,
            granted_minutes: 240,
            reported: true,
            nodes_explored: 17,
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_completeness_and_display() {
        let mut report = AllocationReport {
            tiers: vec![tier(SolveStatus::Optimal), tier(SolveStatus::Infeasible)],
            allocated: Vec::new(),
        };
        assert!(report.is_complete());
        assert_eq!(report.granted_ticks(), 0);
        assert_eq!(
            report.tiers[0].to_string(),
            "Tier(basket#3: optimal, 2 of 4 events, 240 min)"
        );

        report.tiers.push(tier(SolveStatus::Timeout));
        assert!(!report.is_complete());

        let json = report.to_json().unwrap();
        assert!(json.contains("\"status\": \"timeout\""));
    }
}
