//! Users repository
//!
//! Users are only referenced by links and votes. The GraphQL API never
//! writes them; rows are created by the CLI and by tests.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;

use super::sqlite_helpers::{decode_datetime, now_iso8601};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl sqlx::FromRow<'_, SqliteRow> for UserRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let created_str: String = row.try_get("created_at")?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: decode_datetime(&created_str)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(now_iso8601())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
