// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clocking (check-in / check-out) model.

use super::ids::{ClockingId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of clocking event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockingType {
    In,
    Out,
}

impl ClockingType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClockingType::In => "in",
            ClockingType::Out => "out",
        }
    }
}

impl fmt::Display for ClockingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClockingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(ClockingType::In),
            "out" => Ok(ClockingType::Out),
            other => Err(format!("unknown clocking type {:?} (expected \"in\" or \"out\")", other)),
        }
    }
}

/// Whether a user is currently clocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockingState {
    Out,
    In,
}

impl ClockingState {
    /// State after the given event has been recorded.
    pub fn after(event: ClockingType) -> Self {
        match event {
            ClockingType::In => ClockingState::In,
            ClockingType::Out => ClockingState::Out,
        }
    }

    /// The transition out of this state, or `None` if `event` would be a
    /// self-transition.
    pub fn apply(self, event: ClockingType) -> Option<ClockingState> {
        match (self, event) {
            (ClockingState::Out, ClockingType::In) => Some(ClockingState::In),
            (ClockingState::In, ClockingType::Out) => Some(ClockingState::Out),
            _ => None,
        }
    }
}

/// A recorded clocking event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clocking {
    #[serde(rename = "_id")]
    pub id: ClockingId,
    #[serde(rename = "type")]
    pub kind: ClockingType,
    /// When the event happened
    #[serde(rename = "register")]
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "user")]
    pub user_id: UserId,
    /// Position in the user's event sequence (1-based)
    #[serde(skip)]
    pub seq: i64,
}
