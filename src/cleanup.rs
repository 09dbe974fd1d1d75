//! Startup maintenance for the revocation ledger.

use crate::db::Database;
use tracing::{error, info};

/// Purge ledger rows for refresh tokens that have expired anyway.
/// Runs once at startup; expiry is otherwise evaluated lazily at
/// verification time, never swept by a background task.
pub async fn run_cleanup(db: &Database) {
    match db.revocations().delete_expired().await {
        Ok(count) if count > 0 => info!("Purged {} expired revocation entries", count),
        Ok(_) => {}
        Err(e) => error!("Failed to purge expired revocation entries: {}", e),
    }
}
