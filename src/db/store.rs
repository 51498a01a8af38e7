//! Storage seam between the GraphQL resolvers and the database
//!
//! Resolvers only see `Arc<dyn LinkStore>`. Errors come back as
//! `anyhow::Error` wrapping whatever the store produced and are passed to
//! the caller without rewording.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::links::{CreateLink, LinkRecord, UpdateLink};
use super::query::LinkQuery;
use super::users::UserRecord;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Links matching the query's filter, ordered and windowed
    async fn find_many(&self, query: &LinkQuery) -> Result<Vec<LinkRecord>>;

    /// Number of links matching the query's filter; skip and take are ignored
    async fn count(&self, query: &LinkQuery) -> Result<i64>;

    async fn find_by_id(&self, id: i32) -> Result<Option<LinkRecord>>;

    async fn create(&self, input: CreateLink) -> Result<LinkRecord>;

    /// Apply a partial update. Fails with a row-not-found error if `id` does not exist.
    async fn update(&self, id: i32, input: UpdateLink) -> Result<LinkRecord>;

    /// Delete and return the removed row. Fails with a row-not-found error if `id` does not exist.
    async fn delete(&self, id: i32) -> Result<LinkRecord>;

    /// Poster of each link, keyed by link id. Links without a poster are absent.
    async fn posted_by(&self, link_ids: &[i32]) -> Result<HashMap<i32, UserRecord>>;

    /// Voters of each link, keyed by link id. Every requested id is present.
    async fn voters(&self, link_ids: &[i32]) -> Result<HashMap<i32, Vec<UserRecord>>>;
}
