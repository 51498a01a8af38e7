//! Database connection and repositories

pub mod links;
pub mod query;
pub mod sqlite_helpers;
pub mod store;
pub mod users;
pub mod votes;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use links::{CreateLink, LinkRecord, LinkRepository, UpdateLink};
pub use query::{LinkOrder, LinkQuery, LinkQueryError, LinkSortField, SortDirection};
pub use store::LinkStore;
pub use users::{CreateUser, UserRecord, UserRepository};
pub use votes::VoteRepository;

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool.
    ///
    /// The database file is created if missing and foreign keys are enforced
    /// on every connection. For `sqlite::memory:` use a single connection,
    /// each connection otherwise gets its own empty database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to open database")?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get a links repository
    pub fn links(&self) -> LinkRepository {
        LinkRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Get a votes repository
    pub fn votes(&self) -> VoteRepository {
        VoteRepository::new(self.pool.clone())
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }
}
