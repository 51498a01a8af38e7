//! Errors raised by the GraphQL surface
//!
//! Only [`ApiError`] is produced on purpose. Storage failures pass through
//! [`storage_error`] unchanged so the caller sees the store's own message.

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::db::LinkQueryError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid identity on the request. Missing and bad tokens look the same.
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    InvalidQuery(#[from] LinkQueryError),
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| match self {
            ApiError::Unauthorized => e.set("code", "UNAUTHORIZED"),
            ApiError::InvalidQuery(_) => e.set("code", "BAD_USER_INPUT"),
        })
    }
}

/// Surface a storage failure as a GraphQL error, message untouched
pub fn storage_error(err: anyhow::Error) -> async_graphql::Error {
    tracing::debug!(error = %err, "Storage call failed");
    async_graphql::Error::new(err.to_string())
}
