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

//! Solver settings.
//!
//! | Field | Default | Meaning |
//! | :--- | :--- | :--- |
//! | `time_limit_ms` | 60000 | Wall clock budget of a whole run; `null` for none. |
//! | `worker_threads` | 1 | Strategies searched in parallel per tier. |
//! | `strategies` | most constrained, longest first, input order | Branching strategies, in start order. |
//! | `sequencing_node_limit` | 4096 | Node budget of one no-overlap check. |
//! | `include_unbasketed` | true | Solve events without basket as a final tier. |
//! | `log_interval_ms` | 5000 | Interval of search progress lines. |

use crate::error::{AllocationError, ConfigError};
use seasonal_bnb::{
    branching::{
        decision::DecisionBuilder, input_order::InputOrderBuilder,
        longest_first::LongestFirstBuilder, most_constrained::MostConstrainedBuilder,
    },
    sequencing::NoOverlapSequencer,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A branching strategy of the portfolio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    InputOrder,
    LongestFirst,
    MostConstrained,
}

impl Strategy {
    /// Creates a fresh decision builder for one search.
    pub fn builder(self) -> Box<dyn DecisionBuilder> {
        match self {
            Strategy::InputOrder => Box::new(InputOrderBuilder::new()),
            Strategy::LongestFirst => Box::new(LongestFirstBuilder::new()),
            Strategy::MostConstrained => Box::new(MostConstrainedBuilder::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::InputOrder => "input_order",
            Strategy::LongestFirst => "longest_first",
            Strategy::MostConstrained => "most_constrained",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub time_limit_ms: Option<u64>,
    pub worker_threads: usize,
    pub strategies: Vec<Strategy>,
    pub sequencing_node_limit: u64,
    pub include_unbasketed: bool,
    pub log_interval_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(60_000),
            worker_threads: 1,
            strategies: vec![
                Strategy::MostConstrained,
                Strategy::LongestFirst,
                Strategy::InputOrder,
            ],
            sequencing_node_limit: NoOverlapSequencer::DEFAULT_NODE_LIMIT,
            include_unbasketed: true,
            log_interval_ms: 5_000,
        }
    }
}

impl SolverConfig {
    /// Parses and validates a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, AllocationError> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        if self.sequencing_node_limit == 0 {
            return Err(ConfigError::ZeroSequencingNodeLimit);
        }
        Ok(())
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    #[inline]
    pub fn log_interval(&self) -> Duration {
        Duration::from_millis(self.log_interval_ms)
    }

    /// The strategies that get a thread, in start order.
    #[inline]
    pub fn active_strategies(&self) -> &[Strategy] {
        let len = self.worker_threads.min(self.strategies.len());
        &self.strategies[..len]
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit_ms = limit.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[inline]
    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    #[inline]
    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = Strategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    #[inline]
    pub fn with_sequencing_node_limit(mut self, node_limit: u64) -> Self {
        self.sequencing_node_limit = node_limit;
        self
    }

    #[inline]
    pub fn with_include_unbasketed(mut self, include: bool) -> Self {
        self.include_unbasketed = include;
        self
    }

    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.log_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

impl std::fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverConfig(time_limit: {:?}, workers: {}, strategies: [",
            self.time_limit(),
            self.worker_threads
        )?;
        for (i, strategy) in self.strategies.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", strategy)?;
        }
        write!(f, "], sequencing_node_limit: {})", self.sequencing_node_limit)
    }
}
