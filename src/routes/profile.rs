// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The caller's own profile.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Profile, ProfileUpdate};
use crate::routes::extract::ValidJson;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Profile routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employee-service/user/profile", get(get_profile))
        .route("/employee-service/user/update-profile", put(update_profile))
}

/// Editable profile fields, shared with the admin user update.
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[serde(rename = "firstName")]
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[serde(rename = "lastName")]
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
}

impl From<ProfileUpdateRequest> for ProfileUpdate {
    fn from(req: ProfileUpdateRequest) -> Self {
        ProfileUpdate {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            email: req.email.trim().to_string(),
        }
    }
}

/// Response for profile and user updates.
#[derive(Serialize)]
pub struct UserUpdatedResponse {
    pub message: String,
    pub user: Profile,
}

/// Get the current user's profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>> {
    let profile = state.profiles.resolve_profile(user.user_id).await?;
    Ok(Json(profile))
}

/// Update the current user's names and email.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(body): ValidJson<ProfileUpdateRequest>,
) -> Result<Json<UserUpdatedResponse>> {
    let profile = state
        .profiles
        .update_profile(user.user_id, &body.into())
        .await?;

    Ok(Json(UserUpdatedResponse {
        message: "User updated".to_string(),
        user: profile,
    }))
}
