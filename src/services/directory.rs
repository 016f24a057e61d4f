// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role and user administration.

use crate::db::{Db, StoreError};
use crate::models::role::normalize_role_name;
use crate::models::user::DEFAULT_PROFILE_IMAGE;
use crate::models::{NewUser, Profile, Role, RoleId, UserId};
use crate::services::password::{self, PasswordError};
use crate::time_utils::format_utc_rfc3339;

/// Name of the role given to the seeded administrator.
pub const ADMIN_ROLE: &str = "ADMIN";

/// Errors from directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("Role {0} does not exist")]
    UnknownRole(RoleId),

    #[error("Invalid user id {0}")]
    InvalidId(UserId),

    #[error("User {0} not found")]
    NotFound(UserId),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates, lists and deletes roles and users.
#[derive(Clone)]
pub struct Directory {
    db: Db,
}

impl Directory {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    // ─── Roles ───────────────────────────────────────────────────

    /// Create a role. The name is trimmed and upper-cased.
    pub async fn create_role(&self, name: &str) -> Result<Role, DirectoryError> {
        let name = normalize_role_name(name);
        if name.is_empty() {
            return Err(DirectoryError::Validation(
                "Role name must not be empty".to_string(),
            ));
        }

        let now = format_utc_rfc3339(chrono::Utc::now());
        let role = self
            .db
            .create_role(&name, &now)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => DirectoryError::Duplicate("Role"),
                other => DirectoryError::Store(other),
            })?;

        tracing::info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, DirectoryError> {
        Ok(self.db.list_roles().await?)
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Create a user, hashing the password first. Returns the new profile.
    pub async fn create_user(&self, user: NewUser) -> Result<Profile, DirectoryError> {
        if user.password.is_empty() {
            return Err(DirectoryError::Validation(
                "Password must not be empty".to_string(),
            ));
        }

        let hash = password::hash(user.password.clone()).await?;
        let now = format_utc_rfc3339(chrono::Utc::now());

        let user_id = self
            .db
            .insert_user(&user, &hash, &now)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => DirectoryError::Duplicate("User"),
                StoreError::ForeignKey => DirectoryError::UnknownRole(user.role_id),
                other => DirectoryError::Store(other),
            })?;

        tracing::info!(user_id = %user_id, role_id = %user.role_id, "User created");

        self.db
            .get_profile(user_id)
            .await?
            .ok_or(DirectoryError::NotFound(user_id))
    }

    pub async fn list_users(&self) -> Result<Vec<Profile>, DirectoryError> {
        Ok(self.db.list_profiles().await?)
    }

    /// Delete a user together with its clockings.
    pub async fn delete_user(&self, user_id: UserId) -> Result<(), DirectoryError> {
        if user_id.is_sentinel() {
            return Err(DirectoryError::InvalidId(user_id));
        }

        if self.db.delete_user(user_id).await? == 0 {
            return Err(DirectoryError::NotFound(user_id));
        }

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    // ─── Seeding ─────────────────────────────────────────────────

    /// Make sure the administrator role and account exist.
    ///
    /// Safe to call on every startup; existing rows are left untouched.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), DirectoryError> {
        let role = match self.db.get_role_by_name(ADMIN_ROLE).await? {
            Some(role) => role,
            None => self.create_role(ADMIN_ROLE).await?,
        };

        if self.db.find_user_id_by_email(email).await?.is_some() {
            tracing::debug!(email, "Administrator account already present");
            return Ok(());
        }

        let admin = NewUser {
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            profile_image: DEFAULT_PROFILE_IMAGE.to_string(),
            role_id: role.id,
        };
        let profile = self.create_user(admin).await?;

        tracing::info!(user_id = %profile.id, email, "Administrator account seeded");
        Ok(())
    }
}
