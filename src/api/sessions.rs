//! Session management API endpoints.
//!
//! - POST `/login` - Verify credentials, set access + refresh cookies
//! - POST `/logout` - Revoke the refresh token, clear both cookies
//! - POST `/refresh-token` - Exchange the refresh cookie for a new access cookie
//! - GET `/me` - Return the authenticated user's profile

use axum::http::{HeaderMap, StatusCode, header::SET_COOKIE};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use super::error::ApiError;
use crate::auth::{
    ACCESS_COOKIE_NAME, CookieAuth, REFRESH_COOKIE_NAME, RefreshError, RevokeError,
    TokenLifecycle, auth_cookie, clear_cookie, get_cookie, validate_credentials,
};
use crate::db::{Database, UserProfile};
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct SessionsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_state!(SessionsState);

impl SessionsState {
    fn lifecycle(&self) -> TokenLifecycle {
        TokenLifecycle::new(self.jwt.clone(), self.db.clone())
    }
}

pub fn router(state: SessionsState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .route("/me", get(me))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    // Defaulted so a missing field reads as empty and fails credential
    // validation with a 400, not a deserialization rejection.
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Verify credentials and establish a session.
/// On success both auth cookies are set and the response body carries the
/// user profile (never the password hash).
async fn login(
    State(state): State<SessionsState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = validate_credentials(&state.db, &payload.username, &payload.password)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let tokens = state.lifecycle().issue(&user).map_err(|e| {
        error!(user_id = user.id, error = %e, "Failed to issue token pair");
        ApiError::internal("Failed to generate tokens")
    })?;

    if let Err(e) = state.db.users().update_last_login(user.id).await {
        warn!(user_id = user.id, error = %e, "Failed to update last_login");
    }

    Ok((
        StatusCode::OK,
        AppendHeaders([
            (
                SET_COOKIE,
                auth_cookie(
                    ACCESS_COOKIE_NAME,
                    &tokens.access.token,
                    tokens.access.duration,
                ),
            ),
            (
                SET_COOKIE,
                auth_cookie(
                    REFRESH_COOKIE_NAME,
                    &tokens.refresh.token,
                    tokens.refresh.duration,
                ),
            ),
        ]),
        Json(serde_json::json!({ "user": UserProfile::from(&user) })),
    ))
}

/// Revoke the refresh token and clear both cookies.
/// Cookies are only cleared after revocation succeeds; a failed revocation
/// leaves client state untouched so the server and client never disagree
/// about whether a session was ended.
async fn logout(
    State(state): State<SessionsState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let Some(refresh) = get_cookie(&headers, REFRESH_COOKIE_NAME) else {
        return Err(ApiError::bad_request("No refresh token found"));
    };

    state.lifecycle().revoke(refresh).await.map_err(|e| {
        let detail = match &e {
            RevokeError::Malformed(detail) => detail.to_string(),
            RevokeError::Ledger(detail) => {
                error!(error = %detail, "Failed to record token revocation");
                detail.to_string()
            }
        };
        ApiError::bad_request(format!("Token blacklist error: {}", detail))
    })?;

    Ok((
        StatusCode::OK,
        AppendHeaders([
            (SET_COOKIE, clear_cookie(ACCESS_COOKIE_NAME)),
            (SET_COOKIE, clear_cookie(REFRESH_COOKIE_NAME)),
        ]),
        Json(serde_json::json!({ "message": "Logout successful" })),
    ))
}

/// Exchange a valid refresh cookie for a new access cookie.
/// The refresh cookie itself is left untouched (no rotation).
async fn refresh_token(
    State(state): State<SessionsState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let Some(refresh) = get_cookie(&headers, REFRESH_COOKIE_NAME) else {
        return Err(ApiError::unauthorized("No refresh token found"));
    };

    let access = state.lifecycle().refresh(refresh).await.map_err(|e| match e {
        RefreshError::Malformed | RefreshError::Expired | RefreshError::Revoked => {
            ApiError::unauthorized("Invalid refresh token")
        }
        RefreshError::Ledger(detail) => {
            error!(error = %detail, "Revocation ledger lookup failed during refresh");
            ApiError::internal(format!("Token refresh error: {}", detail))
        }
        RefreshError::Mint(detail) => {
            error!(error = %detail, "Failed to mint access token during refresh");
            ApiError::internal(format!("Token refresh error: {}", detail))
        }
    })?;

    Ok((
        StatusCode::OK,
        AppendHeaders([(
            SET_COOKIE,
            auth_cookie(ACCESS_COOKIE_NAME, &access.token, access.duration),
        )]),
        Json(serde_json::json!({ "message": "Token refreshed successfully" })),
    ))
}

/// Return the authenticated user's profile.
async fn me(CookieAuth(auth): CookieAuth) -> impl IntoResponse {
    Json(serde_json::json!({ "user": UserProfile::from(&auth.user) }))
}
