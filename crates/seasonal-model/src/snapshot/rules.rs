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

use crate::snapshot::records::BasketRecord;

/// The categorical attributes of an event that basket rules look at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventAttributes<'a> {
    pub purpose: Option<&'a str>,
    pub age_group: Option<&'a str>,
    pub customer_type: Option<&'a str>,
    pub home_city: Option<&'a str>,
}

#[inline]
fn criterion_matches(rule: Option<&str>, value: Option<&str>) -> bool {
    match rule {
        None => true,
        Some(rule) => value.is_some_and(|value| value.trim().eq_ignore_ascii_case(rule.trim())),
    }
}

impl BasketRecord {
    /// Returns `true` if every criterion of the basket accepts `attributes`.
    ///
    /// Comparison ignores surrounding whitespace and ASCII case.
    pub fn matches(&self, attributes: &EventAttributes<'_>) -> bool {
        criterion_matches(self.purpose.as_deref(), attributes.purpose)
            && criterion_matches(self.age_group.as_deref(), attributes.age_group)
            && criterion_matches(self.customer_type.as_deref(), attributes.customer_type)
            && criterion_matches(self.home_city.as_deref(), attributes.home_city)
    }
}
