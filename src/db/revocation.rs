//! Revocation ledger for refresh tokens.
//!
//! Only revoked refresh tokens are stored; access tokens are stateless and
//! short-lived. A jti present in this table is rejected at refresh time even
//! while the token itself is still cryptographically valid and unexpired.

use sqlx::sqlite::SqlitePool;

/// A revoked refresh token record.
#[derive(Debug, Clone)]
pub struct RevokedToken {
    pub jti: String,
    pub user_id: i64,
    pub expires_at: String,
    pub revoked_at: String,
}

/// Store for the refresh-token revocation ledger.
pub struct RevocationStore {
    pool: SqlitePool,
}

impl RevocationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a refresh token as revoked.
    ///
    /// Idempotent: revoking an already-revoked jti succeeds without changing
    /// the ledger. The INSERT OR IGNORE is the atomic insert-if-absent that
    /// serializes a refresh racing a revoke for the same jti.
    pub async fn revoke(
        &self,
        jti: &str,
        user_id: i64,
        expires_at: u64,
    ) -> Result<(), sqlx::Error> {
        let expires_at_str = timestamp_to_datetime(expires_at);

        sqlx::query(
            "INSERT OR IGNORE INTO revoked_tokens (jti, user_id, expires_at) VALUES (?, ?, ?)",
        )
        .bind(jti)
        .bind(user_id)
        .bind(&expires_at_str)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Check whether a jti has been revoked.
    pub async fn is_revoked(&self, jti: &str) -> Result<bool, sqlx::Error> {
        let row: (i32,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = ?)")
                .bind(jti)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0 != 0)
    }

    /// Get a ledger entry by its jti.
    pub async fn get_by_jti(&self, jti: &str) -> Result<Option<RevokedToken>, sqlx::Error> {
        let row: Option<(String, i64, String, String)> = sqlx::query_as(
            "SELECT jti, user_id, expires_at, revoked_at FROM revoked_tokens WHERE jti = ?",
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(jti, user_id, expires_at, revoked_at)| RevokedToken {
            jti,
            user_id,
            expires_at,
            revoked_at,
        }))
    }

    /// Delete ledger entries whose token has expired anyway.
    /// An expired token fails signature-level validation before the ledger
    /// is ever consulted, so these rows are dead weight.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < datetime('now')")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Convert a Unix timestamp to an ISO 8601 datetime string for SQLite.
fn timestamp_to_datetime(timestamp: u64) -> String {
    let days_since_epoch = timestamp / 86400;
    let time_of_day = timestamp % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let (year, month, day) = days_to_ymd(days_since_epoch as i64);

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, month, day, hours, minutes, seconds
    )
}

/// Convert days since Unix epoch to year, month, day.
fn days_to_ymd(days: i64) -> (i32, u32, u32) {
    // Algorithm from http://howardhinnant.github.io/date_algorithms.html
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y as i32, m, d)
}
