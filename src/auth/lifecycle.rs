//! Token lifecycle: issue, refresh, revoke.
//!
//! Issue is persistence-free: only revocation writes to the ledger, so a
//! refresh token is valid exactly while it verifies and its jti is absent
//! from the ledger.

use std::sync::Arc;

use crate::db::{Database, User};
use crate::jwt::{AccessTokenResult, JwtConfig, JwtError, RefreshTokenResult};

/// The credential pair minted at login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access: AccessTokenResult,
    pub refresh: RefreshTokenResult,
}

/// Why a refresh attempt failed.
#[derive(Debug)]
pub enum RefreshError {
    /// The token cannot be decoded or verified (bad signature, wrong type,
    /// structurally wrong)
    Malformed,
    /// The token is past its expiry
    Expired,
    /// The token's jti is in the revocation ledger
    Revoked,
    /// Ledger lookup failed
    Ledger(sqlx::Error),
    /// Minting the replacement access token failed
    Mint(JwtError),
}

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshError::Malformed => write!(f, "Refresh token is malformed"),
            RefreshError::Expired => write!(f, "Refresh token has expired"),
            RefreshError::Revoked => write!(f, "Refresh token has been revoked"),
            RefreshError::Ledger(e) => write!(f, "Revocation ledger error: {}", e),
            RefreshError::Mint(e) => write!(f, "Failed to mint access token: {}", e),
        }
    }
}

impl std::error::Error for RefreshError {}

/// Why a revocation attempt failed.
#[derive(Debug)]
pub enum RevokeError {
    /// The token cannot be decoded or verified; carries the decode detail
    Malformed(JwtError),
    /// Ledger insert failed
    Ledger(sqlx::Error),
}

impl std::fmt::Display for RevokeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevokeError::Malformed(e) => write!(f, "{}", e),
            RevokeError::Ledger(e) => write!(f, "Revocation ledger error: {}", e),
        }
    }
}

impl std::error::Error for RevokeError {}

/// Issues access/refresh pairs, rotates access tokens from refresh tokens,
/// and revokes refresh tokens into the ledger.
pub struct TokenLifecycle {
    jwt: Arc<JwtConfig>,
    db: Database,
}

impl TokenLifecycle {
    pub fn new(jwt: Arc<JwtConfig>, db: Database) -> Self {
        Self { jwt, db }
    }

    /// Mint an access/refresh pair for an authenticated user.
    pub fn issue(&self, user: &User) -> Result<IssuedTokens, JwtError> {
        let access = self.jwt.generate_access_token(user.id, &user.username)?;
        let refresh = self.jwt.generate_refresh_token(user.id, &user.username)?;
        Ok(IssuedTokens { access, refresh })
    }

    /// Exchange a valid, unrevoked refresh token for a new access token.
    /// The refresh token itself is not rotated; the same token keeps working
    /// until it expires or is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessTokenResult, RefreshError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::Expired => RefreshError::Expired,
                _ => RefreshError::Malformed,
            })?;

        let revoked = self
            .db
            .revocations()
            .is_revoked(&claims.jti)
            .await
            .map_err(RefreshError::Ledger)?;
        if revoked {
            return Err(RefreshError::Revoked);
        }

        self.jwt
            .generate_access_token(claims.sub, &claims.username)
            .map_err(RefreshError::Mint)
    }

    /// Revoke a refresh token by recording its jti in the ledger.
    /// Idempotent: revoking an already-revoked token succeeds.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), RevokeError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(RevokeError::Malformed)?;

        self.db
            .revocations()
            .revoke(&claims.jti, claims.sub, claims.exp)
            .await
            .map_err(RevokeError::Ledger)
    }
}
