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

use seasonal_model::err::ModelError;

/// Rejected solver settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("worker_threads must be at least 1")]
    NoWorkers,

    #[error("at least one search strategy must be configured")]
    NoStrategies,

    #[error("sequencing_node_limit must be at least 1")]
    ZeroSequencingNodeLimit,
}

/// Everything that can stop an allocation run before it starts searching.
///
/// Infeasible tiers and reached deadlines are not errors; they are reported
/// through `SolveStatus` in the `AllocationReport`.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid round snapshot: {0}")]
    Model(#[from] ModelError),

    #[error("invalid solver configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),
}
