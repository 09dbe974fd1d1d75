//! Credential validation for the login endpoint.

use tracing::error;

use crate::db::{Database, User};
use crate::password;

/// Why a login attempt was refused. All variants map to HTTP 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// Username or password missing from the request
    MissingFields,
    /// Unknown username or wrong password - one variant for both, so the
    /// response cannot be used to enumerate usernames
    InvalidCredentials,
    /// Credentials are correct but the account is deactivated
    AccountDisabled,
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialError::MissingFields => write!(f, "Username and password are required"),
            CredentialError::InvalidCredentials => write!(f, "Invalid credentials"),
            CredentialError::AccountDisabled => write!(f, "User account is disabled"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// Verify a username/password pair against the user store.
///
/// Store failures are logged and reported as `InvalidCredentials` rather than
/// propagated, so clients cannot distinguish them from an unknown username.
pub async fn validate_credentials(
    db: &Database,
    username: &str,
    password: &str,
) -> Result<User, CredentialError> {
    if username.is_empty() || password.is_empty() {
        return Err(CredentialError::MissingFields);
    }

    let user = match db.users().get_by_username(username).await {
        Ok(user) => user,
        Err(e) => {
            error!(username = %username, error = %e, "User lookup failed during login");
            None
        }
    };

    let Some(user) = user else {
        return Err(CredentialError::InvalidCredentials);
    };

    let password_matches = match password::verify_password(password, &user.password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            error!(username = %username, error = %e, "Password verification failed");
            false
        }
    };

    if !password_matches {
        return Err(CredentialError::InvalidCredentials);
    }

    if !user.is_active {
        return Err(CredentialError::AccountDisabled);
    }

    Ok(user)
}
