pub mod api;
pub mod auth;
pub mod cleanup;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod password;

use std::sync::Arc;

use api::create_api_router;
use axum::Router;
use db::Database;
use jwt::JwtConfig;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Clock skew tolerance (seconds) applied to token expiry checks
    pub clock_skew_leeway: u64,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret).with_leeway(config.clock_skew_leeway));

    Router::new().nest("/api/users", create_api_router(config.db.clone(), jwt))
}

/// Run startup maintenance tasks. Call this before starting the server.
pub async fn init_cleanup(db: &Database) {
    cleanup::run_cleanup(db).await;
}
