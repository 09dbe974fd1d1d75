//! Tests for the login endpoint.
//!
//! Covers credential validation, the user projection in the response body,
//! cookie issuance with the fixed transport attributes, and the
//! no-username-enumeration property.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_success_sets_cookies_and_returns_user() {
    let (app, db, jwt) = create_test_app().await;
    let id = seed_user(&db, "alice", "correct").await;

    let response = app
        .oneshot(login_request(json!({"username": "alice", "password": "correct"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookies = extract_set_cookies(&response);
    let access = set_cookie_value(&cookies, "access_token").expect("access cookie set");
    let refresh = set_cookie_value(&cookies, "refresh_token").expect("refresh cookie set");

    // Both tokens decode and carry the user's id as subject
    assert_eq!(jwt.validate_access_token(&access).unwrap().sub, id);
    assert_eq!(jwt.validate_refresh_token(&refresh).unwrap().sub, id);

    // Fixed transport attributes on every set
    for cookie in &cookies {
        assert!(cookie.contains("HttpOnly"), "missing HttpOnly: {}", cookie);
        assert!(cookie.contains("Secure"), "missing Secure: {}", cookie);
        assert!(
            cookie.contains("SameSite=None"),
            "missing SameSite=None: {}",
            cookie
        );
    }

    let body = body_json(response).await;
    assert_eq!(body["user"]["id"], id);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["is_active"], true);
    assert_eq!(body["user"]["is_staff"], false);
    assert_eq!(body["user"]["is_superuser"], false);
    assert!(
        body["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_are_identical() {
    let (app, db, _) = create_test_app().await;
    seed_user(&db, "alice", "correct").await;

    let wrong_password = app
        .clone()
        .oneshot(login_request(json!({"username": "alice", "password": "wrong"})))
        .await
        .unwrap();
    let unknown_user = app
        .oneshot(login_request(json!({"username": "nobody", "password": "wrong"})))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    // No cookies on failure
    assert!(extract_set_cookies(&wrong_password).is_empty());
    assert!(extract_set_cookies(&unknown_user).is_empty());

    // Identical bodies: the response must not reveal whether the username exists
    let body1 = body_json(wrong_password).await;
    let body2 = body_json(unknown_user).await;
    assert_eq!(body1, body2);
    assert_eq!(body1["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_disabled_account_rejected() {
    let (app, db, _) = create_test_app().await;
    let id = seed_user(&db, "alice", "correct").await;
    db.users().set_active(id, false).await.unwrap();

    let response = app
        .oneshot(login_request(json!({"username": "alice", "password": "correct"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "User account is disabled");
}

#[tokio::test]
async fn test_login_missing_fields_rejected() {
    let (app, _, _) = create_test_app().await;

    let bodies = [
        json!({}),
        json!({"username": "alice"}),
        json!({"password": "secret"}),
        json!({"username": "", "password": ""}),
    ];

    for body in bodies {
        let response = app.clone().oneshot(login_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Username and password are required");
    }
}

#[tokio::test]
async fn test_login_rejects_get() {
    let (app, _, _) = create_test_app().await;

    let response = app
        .oneshot(request_with_cookie("GET", "/api/users/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_login_stamps_last_login() {
    let (app, db, _) = create_test_app().await;
    let id = seed_user(&db, "alice", "correct").await;

    assert!(db.users().get_by_id(id).await.unwrap().unwrap().last_login.is_none());

    let response = app
        .oneshot(login_request(json!({"username": "alice", "password": "correct"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = db.users().get_by_id(id).await.unwrap().unwrap();
    assert!(user.last_login.is_some());
}

#[tokio::test]
async fn test_login_username_is_case_insensitive() {
    let (app, db, _) = create_test_app().await;
    seed_user(&db, "Alice", "correct").await;

    let response = app
        .oneshot(login_request(json!({"username": "alice", "password": "correct"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "Alice");
}
