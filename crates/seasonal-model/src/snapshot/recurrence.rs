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

use crate::time::Period;
use chrono::{Datelike, NaiveDate, Weekday};

/// Expands a weekly schedule into the period days it recurs on.
///
/// The recurrence is clipped to `[begin, end]` when given. With `biweekly`,
/// every second week is kept, counting from the first matching date.
///
/// # Examples
///
/// ```rust
/// # use chrono::{NaiveDate, Weekday};
/// # use seasonal_model::time::Period;
/// # use seasonal_model::snapshot::recurrence::expand_weekly;
/// let period = Period::try_new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// ).unwrap();
/// assert_eq!(expand_weekly(&period, Weekday::Wed, None, None, false), vec![2, 9, 16, 23, 30]);
/// assert_eq!(expand_weekly(&period, Weekday::Wed, None, None, true), vec![2, 16, 30]);
/// ```
pub fn expand_weekly(
    period: &Period,
    weekday: Weekday,
    begin: Option<NaiveDate>,
    end: Option<NaiveDate>,
    biweekly: bool,
) -> Vec<u32> {
    let first_date = begin.map_or(period.start(), |b| b.max(period.start()));
    let last_date = end.map_or(period.end(), |e| e.min(period.end()));
    let (Some(first), Some(last)) = (period.day_index(first_date), period.day_index(last_date))
    else {
        return Vec::new();
    };
    if first > last {
        return Vec::new();
    }

    let offset = (weekday.num_days_from_monday() + 7 - first_date.weekday().num_days_from_monday()) % 7;
    let step = if biweekly { 14 } else { 7 };
    (first + offset..=last).step_by(step).collect()
}
