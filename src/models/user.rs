// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.
//!
//! None of these types carries a password. The hash only ever lives in
//! [`crate::db::sqlite::CredentialRecord`], which is private to the
//! authentication path.

use super::ids::{RoleId, UserId};
use super::role::Role;
use serde::{Deserialize, Serialize};

/// Default profile image for users created without one.
pub const DEFAULT_PROFILE_IMAGE: &str = "upload/nopfp.png";

/// Public-safe, role-joined view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    /// Relative reference to the profile image (e.g. `upload/alice.png`)
    #[serde(rename = "profileImage")]
    pub profile_image: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub role: Role,
}

/// The authenticated principal derived from credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    /// "First Last"
    pub display_name: String,
    pub email: String,
    /// Role name, e.g. `ADMIN`
    pub role: String,
}

/// Submitted login credentials. Never persisted.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Login identifier (email)
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The mutable subset of a user's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A user about to be created. `password` is plaintext until hashed by the
/// directory service.
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub profile_image: String,
    pub role_id: RoleId,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("profile_image", &self.profile_image)
            .field("role_id", &self.role_id)
            .finish_non_exhaustive()
    }
}
