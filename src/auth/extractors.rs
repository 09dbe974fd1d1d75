//! Cookie authentication strategy and axum extractors.
//!
//! Protected routes authenticate from the `access_token` cookie only; the
//! `Authorization` header is never consulted. The strategy distinguishes a
//! missing cookie (anonymous request) from a bad one (rejected request).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::error;

use super::cookie::{ACCESS_COOKIE_NAME, get_cookie};
use super::errors::{ApiAuthError, AuthErrorKind};
use super::state::HasAuthState;
use super::types::AuthenticatedUser;

/// Terminal outcome of authenticating one request.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Access cookie verified and subject resolved
    Authenticated(AuthenticatedUser),
    /// No access cookie on the request - not an error
    Anonymous,
    /// Access cookie present but unusable
    Rejected(AuthErrorKind),
}

/// Authenticate a request from its access-token cookie.
///
/// 1. No cookie -> `Anonymous`.
/// 2. Decode/verify failure (malformed, tampered, expired, wrong type) ->
///    `Rejected(InvalidToken)`.
/// 3. Subject resolution: unknown user -> `Rejected(UserResolutionFailed)`,
///    deactivated user -> `Rejected(AccountDisabled)`.
/// 4. Otherwise `Authenticated`.
pub async fn authenticate_request<S>(parts: &Parts, state: &S) -> AuthOutcome
where
    S: HasAuthState + Send + Sync,
{
    let Some(token) = get_cookie(&parts.headers, ACCESS_COOKIE_NAME) else {
        return AuthOutcome::Anonymous;
    };

    let claims = match state.jwt().validate_access_token(token) {
        Ok(claims) => claims,
        Err(_) => return AuthOutcome::Rejected(AuthErrorKind::InvalidToken),
    };

    let user = match state.db().users().get_by_id(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return AuthOutcome::Rejected(AuthErrorKind::UserResolutionFailed),
        Err(e) => {
            error!(user_id = claims.sub, error = %e, "Failed to resolve token subject");
            return AuthOutcome::Rejected(AuthErrorKind::DatabaseError);
        }
    };

    if !user.is_active {
        return AuthOutcome::Rejected(AuthErrorKind::AccountDisabled);
    }

    AuthOutcome::Authenticated(AuthenticatedUser { claims, user })
}

/// Extractor for endpoints that require authentication.
/// Anonymous requests are rejected with 401 alongside bad-token requests.
pub struct CookieAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CookieAuth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match authenticate_request(parts, state).await {
            AuthOutcome::Authenticated(user) => Ok(CookieAuth(user)),
            AuthOutcome::Anonymous => Err(ApiAuthError::new(AuthErrorKind::NotAuthenticated)),
            AuthOutcome::Rejected(kind) => Err(ApiAuthError::new(kind)),
        }
    }
}

/// Extractor for endpoints that allow anonymous access.
/// Anonymous requests resolve to `None`; a present-but-invalid token is still
/// rejected rather than silently downgraded to anonymous.
pub struct MaybeAuth(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match authenticate_request(parts, state).await {
            AuthOutcome::Authenticated(user) => Ok(MaybeAuth(Some(user))),
            AuthOutcome::Anonymous => Ok(MaybeAuth(None)),
            AuthOutcome::Rejected(kind) => Err(ApiAuthError::new(kind)),
        }
    }
}
