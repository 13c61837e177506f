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

use crate::id::BasketId;

/// A priority tier for allocation.
///
/// Baskets are allocated in ascending `order_number`. Among baskets sharing
/// an order number, the one with the larger `allocation_percentage` goes
/// first, and the external id breaks remaining ties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Basket {
    pub(crate) id: BasketId,
    pub(crate) name: String,
    pub(crate) order_number: u32,
    pub(crate) allocation_percentage: u8,
}

impl Basket {
    #[inline]
    pub fn id(&self) -> BasketId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower numbers are allocated first.
    #[inline]
    pub fn order_number(&self) -> u32 {
        self.order_number
    }

    #[inline]
    pub fn allocation_percentage(&self) -> u8 {
        self.allocation_percentage
    }

    /// The sort key that defines tier order.
    #[inline]
    pub fn priority_key(&self) -> (u32, std::cmp::Reverse<u8>, BasketId) {
        (
            self.order_number,
            std::cmp::Reverse(self.allocation_percentage),
            self.id,
        )
    }
}

impl std::fmt::Display for Basket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' (order {}, {}%)",
            self.id, self.name, self.order_number, self.allocation_percentage
        )
    }
}
