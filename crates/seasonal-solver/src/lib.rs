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

//! # Seasonal Solver
//!
//! Runs a complete allocation round: one exact search per basket tier, in
//! tier order, each on the capacity the previous tiers left over.
//!
//! ## Modules
//!
//! - `tiering`: `allocate`, the tier loop and tier planning.
//! - `portfolio`: parallel strategies sharing one incumbent per tier.
//! - `extract`: solution to `AllocatedEvent` records.
//! - `config` / `context`: `SolverConfig` and the per-run `RunContext`
//!   (deadline, cancellation, tracing label).
//! - `report`: what a run returns.
//! - `error`: `AllocationError`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use seasonal_model::snapshot::config::SnapshotConfig;
//! use seasonal_solver::{config::SolverConfig, context::RunContext, tiering::allocate_json};
//!
//! # fn run(round_json: &str) -> Result<(), seasonal_solver::error::AllocationError> {
//! let config = SolverConfig::from_json_str(r#"{ "time_limit_ms": 30000, "worker_threads": 2 }"#)?;
//! let ctx = RunContext::new(config).with_label("spring-round");
//! let report = allocate_json(round_json, SnapshotConfig::default(), &ctx)?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod portfolio;
pub mod report;
pub mod tiering;
