// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-joined user profiles.

use crate::db::{Db, StoreError};
use crate::models::{Profile, ProfileUpdate, UserId};

/// Errors from [`ProfileResolver::resolve_profile`].
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("User {0} not found")]
    NotFound(UserId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from [`ProfileResolver::update_profile`].
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Invalid user id {0}")]
    InvalidId(UserId),

    #[error("User {0} not found")]
    NotFound(UserId),

    #[error("Email already in use")]
    Duplicate,

    #[error("Database error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for UpdateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => UpdateError::Duplicate,
            other => UpdateError::Store(other),
        }
    }
}

/// Reads and updates user profiles.
#[derive(Clone)]
pub struct ProfileResolver {
    db: Db,
}

impl ProfileResolver {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Profile of one user, joined with its role.
    pub async fn resolve_profile(&self, user_id: UserId) -> Result<Profile, ProfileError> {
        self.db
            .get_profile(user_id)
            .await?
            .ok_or(ProfileError::NotFound(user_id))
    }

    /// All profiles, oldest first.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.db.list_profiles().await
    }

    /// Update first name, last name and email, then return the stored profile.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, UpdateError> {
        if user_id.is_sentinel() {
            return Err(UpdateError::InvalidId(user_id));
        }

        let affected = self.db.update_profile(user_id, update).await?;
        if affected == 0 {
            return Err(UpdateError::NotFound(user_id));
        }

        tracing::info!(user_id = %user_id, "Profile updated");

        // Deleted between the update and the read.
        self.db
            .get_profile(user_id)
            .await?
            .ok_or(UpdateError::NotFound(user_id))
    }
}
