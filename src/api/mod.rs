//! HTTP API surface.

pub mod error;
pub mod sessions;

use std::sync::Arc;

use axum::Router;

use crate::db::Database;
use crate::jwt::JwtConfig;
use sessions::SessionsState;

/// Assemble the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>) -> Router {
    sessions::router(SessionsState { db, jwt })
}
