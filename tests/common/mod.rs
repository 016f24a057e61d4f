// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use employee_service::config::Config;
use employee_service::db::Db;
use employee_service::models::{NewUser, Profile};
use employee_service::routes::create_router;
use employee_service::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse";

/// Create a test app backed by a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default()).await
}

#[allow(dead_code)]
pub async fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let db = Db::new_in_memory()
        .await
        .expect("Failed to open in-memory database");
    let state = Arc::new(AppState::new(config, db));
    (create_router(state.clone()), state)
}

/// Create a user with [`TEST_PASSWORD`], creating the role if needed.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, email: &str, role: &str) -> Profile {
    let roles = state.directory.list_roles().await.unwrap();
    let role = match roles.into_iter().find(|r| r.name == role.to_uppercase()) {
        Some(role) => role,
        None => state.directory.create_role(role).await.unwrap(),
    };

    state
        .directory
        .create_user(NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            profile_image: "upload/nopfp.png".to_string(),
            role_id: role.id,
        })
        .await
        .unwrap()
}

/// Send a request and return the status and the JSON body (`Null` if empty).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Log in through the API and return the access token.
#[allow(dead_code)]
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/employee-service/user/auth/login",
        None,
        Some(serde_json::json!({ "username": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}
