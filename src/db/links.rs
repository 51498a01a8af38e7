//! Links repository
//!
//! SQLite implementation of [`LinkStore`]. Update and delete use
//! `RETURNING` with `fetch_one`, so a missing id surfaces as
//! `sqlx::Error::RowNotFound` straight from the driver.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use super::query::{LINK_COLUMNS, LinkQuery};
use super::sqlite_helpers::{decode_datetime, now_iso8601, placeholders};
use super::store::LinkStore;
use super::users::UserRecord;

/// Link record from database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: i32,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// NULL once the poster has been removed
    pub posted_by_id: Option<i32>,
}

impl sqlx::FromRow<'_, SqliteRow> for LinkRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let created_str: String = row.try_get("created_at")?;

        Ok(Self {
            id: row.try_get("id")?,
            description: row.try_get("description")?,
            url: row.try_get("url")?,
            created_at: decode_datetime(&created_str)?,
            posted_by_id: row.try_get("posted_by_id")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateLink {
    pub description: String,
    pub url: String,
    pub posted_by_id: i32,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateLink {
    pub description: Option<String>,
    pub url: Option<String>,
}

impl UpdateLink {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.url.is_none()
    }
}

pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for LinkRepository {
    async fn find_many(&self, query: &LinkQuery) -> Result<Vec<LinkRecord>> {
        let (sql, values) = query.build_sql();
        tracing::debug!(sql = %sql, "Executing link query");

        let mut q = sqlx::query_as::<_, LinkRecord>(&sql);
        for value in &values {
            q = q.bind(value);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn count(&self, query: &LinkQuery) -> Result<i64> {
        let (sql, values) = query.build_count_sql();
        tracing::debug!(sql = %sql, "Executing count query");

        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for value in &values {
            q = q.bind(value);
        }

        Ok(q.fetch_one(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<LinkRecord>> {
        let sql = format!("SELECT {} FROM links WHERE id = ?", LINK_COLUMNS);
        let record = sqlx::query_as::<_, LinkRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn create(&self, input: CreateLink) -> Result<LinkRecord> {
        let sql = format!(
            "INSERT INTO links (description, url, created_at, posted_by_id) VALUES (?, ?, ?, ?) RETURNING {}",
            LINK_COLUMNS
        );
        let record = sqlx::query_as::<_, LinkRecord>(&sql)
            .bind(&input.description)
            .bind(&input.url)
            .bind(now_iso8601())
            .bind(input.posted_by_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn update(&self, id: i32, input: UpdateLink) -> Result<LinkRecord> {
        // COALESCE keeps the stored value for unset fields; an empty patch
        // still touches the row so a missing id is reported
        let sql = format!(
            "UPDATE links SET description = COALESCE(?, description), url = COALESCE(?, url) WHERE id = ? RETURNING {}",
            LINK_COLUMNS
        );
        let record = sqlx::query_as::<_, LinkRecord>(&sql)
            .bind(&input.description)
            .bind(&input.url)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn delete(&self, id: i32) -> Result<LinkRecord> {
        let sql = format!("DELETE FROM links WHERE id = ? RETURNING {}", LINK_COLUMNS);
        let record = sqlx::query_as::<_, LinkRecord>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn posted_by(&self, link_ids: &[i32]) -> Result<HashMap<i32, UserRecord>> {
        if link_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT l.id AS link_id, u.id, u.name, u.email, u.created_at \
             FROM links l JOIN users u ON u.id = l.posted_by_id \
             WHERE l.id IN ({})",
            placeholders(link_ids.len())
        );

        let mut query = sqlx::query(&sql);
        for id in link_ids {
            query = query.bind(*id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let mut result = HashMap::with_capacity(rows.len());
        for row in rows {
            let link_id: i32 = row.try_get("link_id")?;
            result.insert(link_id, UserRecord::from_row(&row)?);
        }

        Ok(result)
    }

    async fn voters(&self, link_ids: &[i32]) -> Result<HashMap<i32, Vec<UserRecord>>> {
        let mut result: HashMap<i32, Vec<UserRecord>> =
            link_ids.iter().map(|id| (*id, Vec::new())).collect();
        if link_ids.is_empty() {
            return Ok(result);
        }

        let sql = format!(
            "SELECT v.link_id, u.id, u.name, u.email, u.created_at \
             FROM votes v JOIN users u ON u.id = v.user_id \
             WHERE v.link_id IN ({}) \
             ORDER BY v.created_at ASC, u.id ASC",
            placeholders(link_ids.len())
        );

        let mut query = sqlx::query(&sql);
        for id in link_ids {
            query = query.bind(*id);
        }

        for row in query.fetch_all(&self.pool).await? {
            let link_id: i32 = row.try_get("link_id")?;
            if let Some(voters) = result.get_mut(&link_id) {
                voters.push(UserRecord::from_row(&row)?);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::query::{LinkOrder, LinkSortField, SortDirection};
    use crate::db::{CreateUser, Database};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    async fn setup() -> (Database, i32) {
        let db = Database::connect("sqlite::memory:", 1).await.unwrap();
        db.migrate().await.unwrap();
        let user = db
            .users()
            .create(CreateUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();
        (db, user.id)
    }

    async fn create(db: &Database, user_id: i32, description: &str, url: &str) -> LinkRecord {
        db.links()
            .create(CreateLink {
                description: description.to_string(),
                url: url.to_string(),
                posted_by_id: user_id,
            })
            .await
            .unwrap()
    }

    fn descriptions(records: &[LinkRecord]) -> Vec<&str> {
        records.iter().map(|r| r.description.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (db, user_id) = setup().await;
        let created = create(&db, user_id, "Rust book", "https://doc.rust-lang.org/book").await;

        let found = db.links().find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));
        assert_eq!(created.posted_by_id, Some(user_id));

        assert_eq!(db.links().find_by_id(created.id + 100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let (db, user_id) = setup().await;
        let created = create(&db, user_id, "old", "https://old.example").await;

        let updated = db
            .links()
            .update(
                created.id,
                UpdateLink {
                    description: Some("new".to_string()),
                    url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "new");
        assert_eq!(updated.url, "https://old.example");
        assert_eq!(updated.created_at, created.created_at);

        let unchanged = db.links().update(created.id, UpdateLink::default()).await.unwrap();
        assert_eq!(unchanged, updated);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_row() {
        let (db, _) = setup().await;

        let err = db.links().update(42, UpdateLink::default()).await.unwrap_err();
        assert_matches!(err.downcast_ref::<sqlx::Error>(), Some(sqlx::Error::RowNotFound));

        let err = db.links().delete(42).await.unwrap_err();
        assert_matches!(err.downcast_ref::<sqlx::Error>(), Some(sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let (db, user_id) = setup().await;
        let created = create(&db, user_id, "gone", "https://gone.example").await;
        db.votes().add(created.id, user_id).await.unwrap();

        let deleted = db.links().delete(created.id).await.unwrap();
        assert_eq!(deleted, created);
        assert_eq!(db.links().find_by_id(created.id).await.unwrap(), None);
        let votes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE link_id = ?")
            .bind(created.id)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(votes, 0);
    }

    #[tokio::test]
    async fn test_filter_and_count() {
        let (db, user_id) = setup().await;
        create(&db, user_id, "foo fighters", "https://a.example").await;
        create(&db, user_id, "bar", "https://foo.example").await;
        create(&db, user_id, "baz", "https://c.example").await;

        let query = LinkQuery::new().filter("foo").take(1);
        let page = db.links().find_many(&query).await.unwrap();
        assert_eq!(descriptions(&page), vec!["foo fighters"]);
        assert_eq!(db.links().count(&query).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_filter_is_literal() {
        let (db, user_id) = setup().await;
        create(&db, user_id, "100% rust", "https://a.example").await;
        create(&db, user_id, "1000 ways", "https://b.example").await;

        let query = LinkQuery::new().filter("100%");
        let page = db.links().find_many(&query).await.unwrap();
        assert_eq!(descriptions(&page), vec!["100% rust"]);
    }

    #[tokio::test]
    async fn test_ordering_and_windows() {
        let (db, user_id) = setup().await;
        for (description, url) in [
            ("c", "https://1.example"),
            ("a", "https://2.example"),
            ("b", "https://2.example"),
            ("d", "https://1.example"),
        ] {
            create(&db, user_id, description, url).await;
        }

        let by_url_then_description = LinkQuery::new()
            .order_by(LinkOrder::new(LinkSortField::Url, SortDirection::Desc))
            .order_by(LinkOrder::new(LinkSortField::Description, SortDirection::Asc));
        let page = db.links().find_many(&by_url_then_description).await.unwrap();
        assert_eq!(descriptions(&page), vec!["a", "b", "c", "d"]);

        let last_two = LinkQuery::new()
            .order_by(LinkOrder::new(LinkSortField::CreatedAt, SortDirection::Asc))
            .take(-2);
        let page = db.links().find_many(&last_two).await.unwrap();
        assert_eq!(descriptions(&page), vec!["b", "d"]);

        let rest = LinkQuery::new().skip(3).unwrap();
        let page = db.links().find_many(&rest).await.unwrap();
        assert_eq!(descriptions(&page), vec!["d"]);
    }

    #[tokio::test]
    async fn test_relations() {
        let (db, alice) = setup().await;
        let bob = db
            .users()
            .create(CreateUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap()
            .id;

        let first = create(&db, alice, "first", "https://1.example").await;
        let second = create(&db, bob, "second", "https://2.example").await;
        db.votes().add(first.id, alice).await.unwrap();
        db.votes().add(first.id, bob).await.unwrap();
        assert!(!db.votes().add(first.id, alice).await.unwrap());

        let posters = db.links().posted_by(&[first.id, second.id]).await.unwrap();
        assert_eq!(posters[&first.id].name, "Alice");
        assert_eq!(posters[&second.id].name, "Bob");

        let voters = db.links().voters(&[first.id, second.id]).await.unwrap();
        let names: Vec<&str> = voters[&first.id].iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert!(voters[&second.id].is_empty());

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(bob)
            .execute(db.pool())
            .await
            .unwrap();
        let posters = db.links().posted_by(&[second.id]).await.unwrap();
        assert!(posters.is_empty());
        let orphan = db.links().find_by_id(second.id).await.unwrap().unwrap();
        assert_eq!(orphan.posted_by_id, None);
    }
}
