//! Authentication user types.

use crate::db::User;
use crate::jwt::AccessClaims;

/// Authenticated principal resolved from the access-token cookie.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// JWT claims from the access token
    pub claims: AccessClaims,
    /// The user record the subject claim resolved to
    pub user: User,
}
