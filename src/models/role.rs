// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role model for storage and API.

use super::ids::RoleId;
use serde::{Deserialize, Serialize};

/// A named role users are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: RoleId,
    /// Upper-cased, unique role name
    pub name: String,
    /// When the role was created (RFC 3339)
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Canonical form of a role name: trimmed and upper-cased.
pub fn normalize_role_name(name: &str) -> String {
    name.trim().to_uppercase()
}
