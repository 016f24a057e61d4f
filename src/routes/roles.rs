// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role administration routes.

use crate::error::Result;
use crate::models::Role;
use crate::routes::extract::ValidJson;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/employee-service/role", get(list_roles))
}

/// Routes that need the administrator role.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/employee-service/role", post(create_role))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Serialize)]
pub struct RoleCreatedResponse {
    pub message: String,
    pub role: Role,
}

#[derive(Serialize)]
pub struct RoleListResponse {
    pub data: Vec<Role>,
}

async fn create_role(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreateRoleRequest>,
) -> Result<Json<RoleCreatedResponse>> {
    let role = state.directory.create_role(&body.name).await?;
    Ok(Json(RoleCreatedResponse {
        message: "Role created".to_string(),
        role,
    }))
}

async fn list_roles(State(state): State<Arc<AppState>>) -> Result<Json<RoleListResponse>> {
    let data = state.directory.list_roles().await?;
    Ok(Json(RoleListResponse { data }))
}
