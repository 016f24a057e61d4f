// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod clocking;
pub mod ids;
pub mod role;
pub mod user;

pub use clocking::{Clocking, ClockingState, ClockingType};
pub use ids::{ClockingId, RoleId, RoleRef, UserId};
pub use role::Role;
pub use user::{Credentials, Identity, NewUser, Profile, ProfileUpdate};
