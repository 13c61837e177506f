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

//! External identifiers.
//!
//! Arena indices are dense and only meaningful inside one model. The
//! identifiers below are the keys the surrounding booking system uses; they
//! travel through the engine unchanged and come back out on every
//! `AllocatedEvent`.

use serde::{Deserialize, Serialize};

macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw identifier.
            #[inline]
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

external_id!(
    /// Identifier of a bookable space.
    SpaceId,
    "space"
);
external_id!(
    /// Identifier of a requested event (a recurring reservation request).
    EventId,
    "event"
);
external_id!(
    /// Identifier of one weekly slot of an event.
    OccurrenceId,
    "occurrence"
);
external_id!(
    /// Identifier of an allocation basket.
    BasketId,
    "basket"
);
external_id!(
    /// Identifier of the application an event was submitted with.
    ApplicationId,
    "application"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_prefixed() {
        assert_eq!(SpaceId(4).to_string(), "space#4");
        assert_eq!(EventId::from(9).to_string(), "event#9");
        assert_eq!(BasketId(1).get(), 1);
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&OccurrenceId(17)).unwrap();
        assert_eq!(json, "17");
        let back: OccurrenceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OccurrenceId(17));
    }
}
