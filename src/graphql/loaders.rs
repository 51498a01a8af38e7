//! DataLoaders for the `Link` relations
//!
//! A page of N links would otherwise cost 2N lookups for `postedBy` and
//! `voters`. Each loader collects the link ids requested in the same tick
//! and resolves them with one store call.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;

use crate::db::LinkStore;

use super::helpers::user_record_to_graphql;
use super::types::User;

/// Link id -> poster. Links without a poster are left out of the map.
pub struct PostedByLoader {
    store: Arc<dyn LinkStore>,
}

impl PostedByLoader {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }
}

impl Loader<i32> for PostedByLoader {
    type Value = User;
    type Error = Arc<anyhow::Error>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        tracing::debug!(link_count = keys.len(), "Batch loading posters");

        let posters = self.store.posted_by(keys).await.map_err(Arc::new)?;
        Ok(posters
            .into_iter()
            .map(|(link_id, user)| (link_id, user_record_to_graphql(user)))
            .collect())
    }
}

/// Link id -> voters, ordered by vote time
pub struct VotersLoader {
    store: Arc<dyn LinkStore>,
}

impl VotersLoader {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }
}

impl Loader<i32> for VotersLoader {
    type Value = Vec<User>;
    type Error = Arc<anyhow::Error>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        tracing::debug!(link_count = keys.len(), "Batch loading voters");

        let voters = self.store.voters(keys).await.map_err(Arc::new)?;
        Ok(voters
            .into_iter()
            .map(|(link_id, users)| {
                (
                    link_id,
                    users.into_iter().map(user_record_to_graphql).collect(),
                )
            })
            .collect())
    }
}
