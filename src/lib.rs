// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Employee service: authentication, roles, user profiles and time clocking.
//!
//! This crate provides the REST backend for an employee-management
//! frontend, backed by SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{Authenticator, ClockingLedger, Directory, ProfileResolver};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub authenticator: Authenticator,
    pub profiles: ProfileResolver,
    pub ledger: ClockingLedger,
    pub directory: Directory,
}

impl AppState {
    /// Wire every service to the same store.
    pub fn new(config: Config, db: Db) -> Self {
        Self {
            authenticator: Authenticator::new(db.clone()),
            profiles: ProfileResolver::new(db.clone()),
            ledger: ClockingLedger::new(db.clone(), config.clocking_start),
            directory: Directory::new(db.clone()),
            config,
            db,
        }
    }
}
