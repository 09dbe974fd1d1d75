//! Authentication error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Internal auth error kind used by the cookie authentication strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    NotAuthenticated,
    InvalidToken,
    UserResolutionFailed,
    AccountDisabled,
    DatabaseError,
}

/// API authentication error (returns a JSON body).
///
/// Rejections never touch the auth cookies: clearing is tied to a successful
/// logout, not to failed requests.
#[derive(Debug)]
pub struct ApiAuthError {
    pub(super) kind: AuthErrorKind,
}

impl ApiAuthError {
    pub(super) fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    fn status_code(&self) -> StatusCode {
        match self.kind {
            AuthErrorKind::NotAuthenticated
            | AuthErrorKind::InvalidToken
            | AuthErrorKind::UserResolutionFailed
            | AuthErrorKind::AccountDisabled => StatusCode::UNAUTHORIZED,
            AuthErrorKind::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::NotAuthenticated => "Not authenticated",
            AuthErrorKind::InvalidToken => "Invalid or expired token",
            AuthErrorKind::UserResolutionFailed => "User not found",
            AuthErrorKind::AccountDisabled => "User account is disabled",
            AuthErrorKind::DatabaseError => "Database error",
        }
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        use axum::Json;
        use serde::Serialize;

        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiAuthError::new(AuthErrorKind::NotAuthenticated).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiAuthError::new(AuthErrorKind::InvalidToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiAuthError::new(AuthErrorKind::DatabaseError).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
