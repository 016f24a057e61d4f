// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::db::StoreError;
use crate::services::{AuthError, ClockingError, DirectoryError, ProfileError, UpdateError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Administrator role required")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "authentication_failed",
                Some("authentication failed".to_string()),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFoundOrBadSecret => AppError::AuthenticationFailed,
            AuthError::Store(e) => e.into(),
            AuthError::Password(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProfileError::Store(e) => e.into(),
        }
    }
}

impl From<UpdateError> for AppError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::InvalidId(_) | UpdateError::Duplicate => {
                AppError::BadRequest(err.to_string())
            }
            UpdateError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateError::Store(e) => e.into(),
        }
    }
}

impl From<ClockingError> for AppError {
    fn from(err: ClockingError) -> Self {
        match err {
            ClockingError::DuplicateState(_) | ClockingError::OutOfOrder { .. } => {
                AppError::BadRequest(err.to_string())
            }
            ClockingError::StorageConflict => AppError::Conflict(err.to_string()),
            ClockingError::Internal(e) => e.into(),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Validation(_)
            | DirectoryError::Duplicate(_)
            | DirectoryError::UnknownRole(_)
            | DirectoryError::InvalidId(_) => AppError::BadRequest(err.to_string()),
            DirectoryError::NotFound(_) => AppError::NotFound(err.to_string()),
            DirectoryError::Password(e) => AppError::Internal(anyhow::Error::new(e)),
            DirectoryError::Store(e) => e.into(),
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
