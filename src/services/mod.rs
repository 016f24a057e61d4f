// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod clocking;
pub mod directory;
pub mod password;
pub mod profile;

pub use auth::{AuthError, Authenticator};
pub use clocking::{ClockingError, ClockingLedger, ClockingStartPolicy};
pub use directory::{Directory, DirectoryError};
pub use profile::{ProfileError, ProfileResolver, UpdateError};
