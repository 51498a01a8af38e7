//! GraphQL schema assembly
//!
//! Every field requires an authenticated user.

use std::sync::Arc;

use async_graphql::dataloader::DataLoader;
use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::LinkStore;

use super::loaders::{PostedByLoader, VotersLoader};
use super::mutations::LinkMutations;
use super::queries::LinkQueries;

/// The GraphQL schema type
pub type LinkFeedSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(LinkQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(LinkMutations);

/// Build the GraphQL schema over a link store
pub fn build_schema(store: Arc<dyn LinkStore>) -> LinkFeedSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(DataLoader::new(
            PostedByLoader::new(store.clone()),
            tokio::spawn,
        ))
        .data(DataLoader::new(VotersLoader::new(store.clone()), tokio::spawn))
        .data(store)
        .extension(Tracing)
        .finish()
}

/// SDL of the schema, for `--print-schema`
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .finish()
        .sdl()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdl_exposes_wire_contract() {
        let sdl = schema_sdl();

        for fragment in [
            "feed(filter: String, orderBy: [LinkOrderByInput!], skip: Int, take: Int): Feed!",
            "link(id: Int!): Link",
            "createLink(description: String!, url: String!): Link!",
            "updateLink(id: Int!, description: String, url: String): Link!",
            "deleteLink(id: Int!): Link!",
            "postedBy: User",
            "voters: [User!]!",
            "createdAt: DateTime!",
            "enum Sort",
        ] {
            assert!(sdl.contains(fragment), "missing `{}` in:\n{}", fragment, sdl);
        }
    }
}
