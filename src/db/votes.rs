//! Votes repository
//!
//! A vote links one user to one link. Vote rows go away with either side
//! through `ON DELETE CASCADE`.

use anyhow::Result;
use sqlx::SqlitePool;

use super::sqlite_helpers::now_iso8601;

pub struct VoteRepository {
    pool: SqlitePool,
}

impl VoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a vote. Voting twice for the same link is a no-op.
    ///
    /// Returns true if a new vote was stored.
    pub async fn add(&self, link_id: i32, user_id: i32) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO votes (link_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(link_id)
        .bind(user_id)
        .bind(now_iso8601())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
