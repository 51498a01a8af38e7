//! GraphQL API for the link feed
//!
//! Resolvers live in `queries/` and `mutations/` as `#[derive(Default)]`
//! structs merged into the roots in `schema.rs`.

pub mod auth;
pub mod helpers;
pub mod loaders;
pub mod mutations;
pub mod queries;
mod schema;
pub mod service;
pub mod types;

pub use auth::{AuthError, AuthExt, AuthTokenPayload, decode_auth_header, issue_token};
pub use schema::{LinkFeedSchema, MutationRoot, QueryRoot, build_schema, schema_sdl};
