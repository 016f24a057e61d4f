// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role and user administration endpoint tests.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

mod common;

const ROLES: &str = "/employee-service/role";
const USERS: &str = "/employee-service/user";
const USER_LIST: &str = "/employee-service/user/list";

async fn admin_session() -> (axum::Router, std::sync::Arc<employee_service::AppState>, String) {
    let (app, state) = common::create_test_app().await;
    common::seed_user(&state, "admin@example.com", "admin").await;
    let token = common::login(&app, "admin@example.com", common::TEST_PASSWORD).await;
    (app, state, token)
}

fn new_user_body(email: &str, role: Value) -> Value {
    json!({
        "firstName": "Rosalind",
        "lastName": "Franklin",
        "email": email,
        "password": "photo-51-xray",
        "role": role,
    })
}

#[tokio::test]
async fn test_create_and_list_roles() {
    let (app, _, token) = admin_session().await;

    let (status, body) = common::send(
        &app,
        Method::POST,
        ROLES,
        Some(&token),
        Some(json!({ "name": "  developer " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Role created");
    assert_eq!(body["role"]["name"], "DEVELOPER");
    assert!(body["role"]["_id"].as_i64().unwrap() > 0);
    assert!(body["role"]["createdAt"].is_string());

    let (status, body) = common::send(
        &app,
        Method::POST,
        ROLES,
        Some(&token),
        Some(json!({ "name": "Developer" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Role already exists");

    let (status, body) = common::send(&app, Method::GET, ROLES, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ADMIN", "DEVELOPER"]);
}

#[tokio::test]
async fn test_create_user_accepts_numeric_string_role() {
    let (app, state, token) = admin_session().await;
    let role = state.directory.create_role("staff").await.unwrap();

    let (status, body) = common::send(
        &app,
        Method::POST,
        USERS,
        Some(&token),
        Some(new_user_body("rosalind@example.com", json!(role.id.to_string()))),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "User created");
    assert_eq!(body["user"]["role"]["name"], "STAFF");
    assert_eq!(body["user"]["profileImage"], "upload/nopfp.png");
    assert!(body["user"].get("password").is_none());

    // The new account can log in with the submitted password
    common::login(&app, "rosalind@example.com", "photo-51-xray").await;
}

#[tokio::test]
async fn test_create_user_with_profile_image() {
    let (app, state, token) = admin_session().await;
    let role = state.directory.create_role("staff").await.unwrap();

    let mut body = new_user_body("pic@example.com", json!(role.id.get()));
    body["profileImage"] = json!("rosalind.png");
    let (status, response) = common::send(&app, Method::POST, USERS, Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["user"]["profileImage"], "upload/rosalind.png");

    let mut body = new_user_body("sneaky@example.com", json!(role.id.get()));
    body["profileImage"] = json!("../../etc/passwd");
    let (status, _) = common::send(&app, Method::POST, USERS, Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_errors() {
    let (app, state, token) = admin_session().await;
    let role = state.directory.create_role("staff").await.unwrap();

    // Duplicate email
    let (status, body) = common::send(
        &app,
        Method::POST,
        USERS,
        Some(&token),
        Some(new_user_body("admin@example.com", json!(role.id.get()))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "User already exists");

    // Unknown role
    let (status, _) = common::send(
        &app,
        Method::POST,
        USERS,
        Some(&token),
        Some(new_user_body("orphan@example.com", json!(999))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-numeric role
    let (status, _) = common::send(
        &app,
        Method::POST,
        USERS,
        Some(&token),
        Some(new_user_body("weird@example.com", json!("staff"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Short password
    let mut body = new_user_body("short@example.com", json!(role.id.get()));
    body["password"] = json!("123");
    let (status, _) = common::send(&app, Method::POST, USERS, Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = common::send(&app, Method::GET, USER_LIST, Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_users_strips_secrets() {
    let (app, state, token) = admin_session().await;
    common::seed_user(&state, "second@example.com", "staff").await;

    let (status, body) = common::send(&app, Method::GET, USER_LIST, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user["role"]["name"].is_string());
    }
}

#[tokio::test]
async fn test_update_user_by_id() {
    let (app, state, token) = admin_session().await;
    let user = common::seed_user(&state, "old@example.com", "staff").await;

    let (status, body) = common::send(
        &app,
        Method::PUT,
        &format!("/employee-service/user/{}", user.id),
        Some(&token),
        Some(json!({ "firstName": "New", "lastName": "Name", "email": "new@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["_id"], user.id.get());
    assert_eq!(body["user"]["firstName"], "New");
    assert_eq!(body["user"]["email"], "new@example.com");
}

#[tokio::test]
async fn test_update_user_bad_ids() {
    let (app, _, token) = admin_session().await;
    let update = json!({ "firstName": "X", "lastName": "Y", "email": "xy@example.com" });

    let (status, _) = common::send(
        &app,
        Method::PUT,
        "/employee-service/user/abc",
        Some(&token),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = common::send(
        &app,
        Method::PUT,
        "/employee-service/user/0",
        Some(&token),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Invalid user id 0");

    let (status, _) = common::send(
        &app,
        Method::PUT,
        "/employee-service/user/4242",
        Some(&token),
        Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user() {
    let (app, state, token) = admin_session().await;
    let user = common::seed_user(&state, "leaving@example.com", "staff").await;
    let uri = format!("/employee-service/user/{}", user.id);

    let (status, body) = common::send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    let (status, _) = common::send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send(
        &app,
        Method::DELETE,
        "/employee-service/user/-1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(
        &app,
        Method::DELETE,
        "/employee-service/user/nope",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_operations_refused_for_other_roles() {
    let (app, state, _) = admin_session().await;
    let staff = common::seed_user(&state, "staff@example.com", "staff").await;
    let token = common::login(&app, "staff@example.com", common::TEST_PASSWORD).await;
    let role_id = staff.role.id.get();
    let member = format!("/employee-service/user/{}", staff.id);

    let refused = [
        (Method::POST, ROLES.to_string(), Some(json!({ "name": "boss" }))),
        (
            Method::POST,
            USERS.to_string(),
            Some(new_user_body("intruder@example.com", json!(role_id))),
        ),
        (
            Method::PUT,
            member.clone(),
            Some(json!({ "firstName": "A", "lastName": "B", "email": "ab@example.com" })),
        ),
        (Method::DELETE, member, None),
    ];
    for (method, uri, body) in refused {
        let (status, response) =
            common::send(&app, method.clone(), &uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(response["error"], "forbidden");
    }

    // Nothing changed
    let (_, roles) = common::send(&app, Method::GET, ROLES, Some(&token), None).await;
    assert_eq!(roles["data"].as_array().unwrap().len(), 2);
    let (status, users) = common::send(&app, Method::GET, USER_LIST, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);

    // Without a token the admin routes are still 401
    let (status, _) = common::send(&app, Method::POST, ROLES, None, Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
