pub mod links;

pub use links::LinkMutations;

pub(crate) mod prelude {
    pub(crate) use std::sync::Arc;

    pub(crate) use async_graphql::{Context, MaybeUndefined, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::error::storage_error;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
}
