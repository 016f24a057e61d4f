// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login route.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::create_jwt;
use crate::models::Credentials;
use crate::routes::extract::ValidJson;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/employee-service/user/auth/login", post(login))
}

/// Login request body.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Issued access token.
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Exchange credentials for a bearer token.
async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let credentials = Credentials {
        username: body.username,
        password: body.password,
    };

    let identity = state.authenticator.authenticate(&credentials).await?;

    let access_token = create_jwt(
        &identity,
        &state.config.jwt_signing_key,
        state.config.token_ttl_secs,
    )?;

    tracing::info!(user_id = %identity.user_id, role = %identity.role, "User logged in");

    Ok(Json(LoginResponse { access_token }))
}
