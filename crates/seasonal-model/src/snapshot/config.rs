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

use crate::time::TickResolution;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A daily opening window used for spaces without explicit opening hours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Default for OpeningWindow {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
        }
    }
}

/// Settings for turning round records into an `AllocationModel`.
///
/// | Field | Default | Meaning |
/// | :--- | :--- | :--- |
/// | `resolution` | 15 | Minutes per tick. |
/// | `default_opening` | 10:00-22:00 | Opening window of spaces without opening hours. |
/// | `daily_budget_minutes` | 600 | Per-space cap on granted minutes per day; `null` disables it. |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub resolution: TickResolution,
    pub default_opening: OpeningWindow,
    pub daily_budget_minutes: Option<u32>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            resolution: TickResolution::QUARTER_HOUR,
            default_opening: OpeningWindow::default(),
            daily_budget_minutes: Some(600),
        }
    }
}

impl SnapshotConfig {
    pub fn with_resolution(mut self, resolution: TickResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_default_opening(mut self, open: NaiveTime, close: NaiveTime) -> Self {
        self.default_opening = OpeningWindow { open, close };
        self
    }

    pub fn with_daily_budget_minutes(mut self, minutes: Option<u32>) -> Self {
        self.daily_budget_minutes = minutes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_json() {
        let config: SnapshotConfig = serde_json::from_str(r#"{ "resolution": 5 }"#).unwrap();
        assert_eq!(config.resolution.minutes_per_tick(), 5);
        assert_eq!(config.daily_budget_minutes, Some(600));
        assert_eq!(config.default_opening, OpeningWindow::default());

        let config: SnapshotConfig =
            serde_json::from_str(r#"{ "daily_budget_minutes": null }"#).unwrap();
        assert_eq!(config.daily_budget_minutes, None);
    }
}
