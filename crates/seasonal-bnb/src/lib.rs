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

//! Seasonal-BnB: exact search for the occurrence selection problem
//!
//! Given the spaces, events and occurrences of one allocation tier, decide
//! which occurrences to grant, in which space and at which start, so that
//! the total granted time is maximal and no quota, budget or booking
//! conflict is violated.
//!
//! Core flow
//! - Build a `problem::ConstraintModel` from an `AllocationModel` and the
//!   events of the tier.
//! - Choose a `branching::decision::DecisionBuilder` (node and candidate order).
//! - Choose an `eval::evaluator::BoundEvaluator` (admissible upper bound).
//! - Run `bnb::BnbSolver`, optionally sharing a `incumbent::SharedIncumbent`
//!   with other workers, and observe it through `monitor`s.
//!
//! Module map
//! - `problem`: selection variables, occurrence nodes, quotas, no-overlap groups.
//! - `sequencing`: exact no-overlap feasibility for one group.
//! - `bnb`: the solver engine.
//! - `branching`, `eval`, `monitor`: pluggable strategy pieces.
//! - `result`, `solution`, `stats`: what a run returns.

pub mod bnb;
pub mod branching;
pub mod eval;
pub mod incumbent;
pub mod monitor;
pub mod problem;
pub mod result;
pub mod sequencing;
pub mod solution;
mod stack;
pub mod state;
pub mod stats;
mod trail;
