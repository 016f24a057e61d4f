// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Numeric identifiers for stored rows.
//!
//! Every reference to a role, user or clocking row goes through one of these
//! newtypes. Parsing happens at the HTTP boundary, so persistence code only
//! ever sees validated numbers. Zero and negative values are never assigned
//! by the store and act as the "invalid id" sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when an identifier is not a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be numeric, got {0:?}")]
pub struct InvalidId(pub String);

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// True for ids the store never hands out (zero or negative).
            pub fn is_sentinel(self) -> bool {
                self.0 <= 0
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map($name)
                    .map_err(|_| InvalidId(s.to_string()))
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                $name(raw)
            }
        }
    };
}

row_id!(
    /// Primary key of a `users` row.
    UserId
);
row_id!(
    /// Primary key of a `roles` row.
    RoleId
);
row_id!(
    /// Primary key of a `clockings` row.
    ClockingId
);

/// Role reference as sent by clients: either `3` or `"3"`.
///
/// Older clients send the role as a string; anything that is not a number
/// is rejected while deserializing the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRef(pub RoleId);

impl<'de> Deserialize<'de> for RoleRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(RoleRef(RoleId(n))),
            Raw::Text(s) => s
                .parse::<RoleId>()
                .map(RoleRef)
                .map_err(serde::de::Error::custom),
        }
    }
}
