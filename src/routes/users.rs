// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User administration routes.

use crate::error::{AppError, Result};
use crate::models::user::DEFAULT_PROFILE_IMAGE;
use crate::models::{NewUser, Profile, RoleRef, UserId};
use crate::routes::extract::{PathId, ValidJson};
use crate::routes::profile::{ProfileUpdateRequest, UserUpdatedResponse};
use crate::routes::uploads::{self, is_safe_file_name};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/employee-service/user/list", get(list_users))
}

/// Routes that need the administrator role.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employee-service/user", post(create_user))
        .route(
            "/employee-service/user/{id}",
            put(update_user).delete(delete_user),
        )
}

// ─── Create ──────────────────────────────────────────────────

/// New user request body.
#[derive(Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(rename = "firstName")]
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[serde(rename = "lastName")]
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// File name of an image in the upload directory, or of the uploaded
    /// `image` part
    #[serde(rename = "profileImage", default)]
    pub profile_image: Option<String>,
    pub role: RoleRef,
}

#[derive(Serialize)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user: Profile,
}

/// An image part from a multipart create-user request.
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Create-user body.
///
/// Either plain JSON, or `multipart/form-data` with the JSON text in a
/// `json` field and an optional file in an `image` field.
pub struct CreateUserForm {
    pub request: CreateUserRequest,
    pub image: Option<UploadedImage>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for CreateUserForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        if !is_multipart(&req) {
            let ValidJson(request) = ValidJson::<CreateUserRequest>::from_request(req, state).await?;
            return Ok(Self {
                request,
                image: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let mut request = None;
        let mut image = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("json") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    let parsed: CreateUserRequest = serde_json::from_str(&text)
                        .map_err(|e| AppError::BadRequest(format!("Invalid json field: {}", e)))?;
                    parsed.validate()?;
                    request = Some(parsed);
                }
                Some("image") => {
                    // Browsers send an empty file name when no file was chosen
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    if file_name.is_empty() {
                        continue;
                    }
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    image = Some(UploadedImage { file_name, bytes });
                }
                _ => {}
            }
        }

        let request =
            request.ok_or_else(|| AppError::BadRequest("Missing json field".to_string()))?;
        Ok(Self { request, image })
    }
}

fn profile_image_path(requested: Option<&str>) -> Result<String> {
    match requested.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PROFILE_IMAGE.to_string()),
        Some(name) if is_safe_file_name(name) => Ok(format!("upload/{}", name)),
        Some(name) => Err(AppError::BadRequest(format!(
            "Invalid profile image name {:?}",
            name
        ))),
    }
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    CreateUserForm { request: body, image }: CreateUserForm,
) -> Result<Json<UserCreatedResponse>> {
    let stored_image = match &image {
        Some(upload) => {
            uploads::store_image(&state.config.upload_dir, &upload.file_name, &upload.bytes)
                .await?;
            Some(upload.file_name.as_str())
        }
        None => None,
    };

    let profile_image = match stored_image {
        Some(name) => format!("upload/{}", name),
        None => profile_image_path(body.profile_image.as_deref())?,
    };

    let user = NewUser {
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        email: body.email.trim().to_string(),
        password: body.password,
        profile_image,
        role_id: body.role.0,
    };

    let profile = match state.directory.create_user(user).await {
        Ok(profile) => profile,
        Err(e) => {
            if let Some(name) = stored_image {
                uploads::remove_image(&state.config.upload_dir, name).await;
            }
            return Err(e.into());
        }
    };

    Ok(Json(UserCreatedResponse {
        message: "User created".to_string(),
        user: profile,
    }))
}

// ─── List ────────────────────────────────────────────────────

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Profile>>> {
    Ok(Json(state.directory.list_users().await?))
}

// ─── Update / Delete ─────────────────────────────────────────

async fn update_user(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId<UserId>,
    ValidJson(body): ValidJson<ProfileUpdateRequest>,
) -> Result<Json<UserUpdatedResponse>> {
    let profile = state.profiles.update_profile(user_id, &body.into()).await?;

    Ok(Json(UserUpdatedResponse {
        message: "User updated".to_string(),
        user: profile,
    }))
}

#[derive(Serialize)]
pub struct UserDeletedResponse {
    pub message: String,
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId<UserId>,
) -> Result<Json<UserDeletedResponse>> {
    state.directory.delete_user(user_id).await?;

    Ok(Json(UserDeletedResponse {
        message: "User deleted".to_string(),
    }))
}
