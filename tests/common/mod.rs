#![allow(dead_code)]

use authgate::db::Database;
use authgate::jwt::JwtConfig;
use authgate::password::hash_password;
use authgate::{ServerConfig, create_app};
use axum::body::Body;
use axum::http::Request;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-used-only-in-tests";

/// Create a test app over an in-memory database.
/// Returns (app, db, jwt_config) - the jwt_config signs with the same secret
/// as the app, so tests can mint and decode tokens directly.
pub async fn create_test_app() -> (axum::Router, Database, JwtConfig) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_SECRET.to_vec(),
        clock_skew_leeway: 0,
    };
    (create_app(&config), db, JwtConfig::new(TEST_SECRET))
}

/// Seed an active user with the given password. Returns the user id.
pub async fn seed_user(db: &Database, username: &str, password: &str) -> i64 {
    let hash = hash_password(password).expect("Failed to hash test password");
    db.users()
        .create(
            username,
            &format!("{}@example.com", username),
            &hash,
            "",
            "",
        )
        .await
        .expect("Failed to seed user")
}

/// Build a POST /api/users/login request with a JSON credentials body.
pub fn login_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/users/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request with an optional Cookie header.
pub fn request_with_cookie(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn auth_cookies(access_token: &str, refresh_token: &str) -> String {
    format!(
        "access_token={}; refresh_token={}",
        access_token, refresh_token
    )
}

pub fn refresh_cookie_only(refresh_token: &str) -> String {
    format!("refresh_token={}", refresh_token)
}

pub fn access_cookie_only(access_token: &str) -> String {
    format!("access_token={}", access_token)
}

/// Extract Set-Cookie headers from a response.
pub fn extract_set_cookies(response: &axum::http::Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// Check if the Set-Cookie list clears the named cookie (Max-Age=0).
pub fn has_cleared_cookie(cookies: &[String], cookie_name: &str) -> bool {
    cookies
        .iter()
        .any(|c| c.starts_with(&format!("{}=;", cookie_name)) && c.contains("Max-Age=0"))
}

/// Extract the token value set for the named cookie, if any.
pub fn set_cookie_value(cookies: &[String], cookie_name: &str) -> Option<String> {
    cookies.iter().find_map(|c| {
        let rest = c.strip_prefix(&format!("{}=", cookie_name))?;
        let value = rest.split(';').next()?.to_string();
        if value.is_empty() { None } else { Some(value) }
    })
}

/// Read the response body as JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}

/// Flip the last character of a token to corrupt its signature.
pub fn tamper(token: &str) -> String {
    let mut tampered = token.to_string();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });
    tampered
}
