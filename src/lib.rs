//! Link feed backend
//!
//! GraphQL API for sharing links: a filterable, sortable feed plus
//! create/update/delete mutations behind bearer-token authorization.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;

pub use app::{AppState, build_app};
