// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hour register (clocking) routes.
//!
//! Both routes act on the authenticated caller; a user id in the request
//! body is ignored.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Clocking, ClockingType};
use crate::routes::extract::ValidJson;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/employee-service/hour-register",
        get(list_clockings).post(record_clocking),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClockingRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub kind: String,
    /// RFC 3339 timestamp; the server clock is used when absent
    #[serde(default)]
    pub register: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ClockingCreatedResponse {
    pub message: String,
    pub clocking: Clocking,
}

#[derive(Serialize)]
pub struct ClockingListResponse {
    pub data: Vec<Clocking>,
}

async fn record_clocking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(body): ValidJson<ClockingRequest>,
) -> Result<Json<ClockingCreatedResponse>> {
    let kind: ClockingType = body.kind.parse().map_err(AppError::BadRequest)?;
    let registered_at = body.register.unwrap_or_else(Utc::now);

    let clocking = state
        .ledger
        .record_clocking(user.user_id, kind, registered_at)
        .await?;

    Ok(Json(ClockingCreatedResponse {
        message: "Clocking registered".to_string(),
        clocking,
    }))
}

async fn list_clockings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ClockingListResponse>> {
    let data = state.ledger.list_clockings(user.user_id).await?;
    Ok(Json(ClockingListResponse { data }))
}
