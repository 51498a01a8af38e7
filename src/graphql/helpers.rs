// Helper functions shared across GraphQL query/mutation modules.

use async_graphql::MaybeUndefined;

use crate::db::{LinkQuery, LinkRecord, UserRecord};
use crate::error::ApiError;
use crate::graphql::types::{Link, LinkOrderByInput, User};

/// Convert a LinkRecord from the database to a GraphQL Link type
pub(crate) fn link_record_to_graphql(r: LinkRecord) -> Link {
    Link {
        id: r.id,
        description: r.description,
        url: r.url,
        created_at: r.created_at,
    }
}

/// Convert a UserRecord from the database to a GraphQL User type
pub(crate) fn user_record_to_graphql(r: UserRecord) -> User {
    User {
        id: r.id,
        name: r.name,
        email: r.email,
    }
}

/// Normalise an optional update argument.
///
/// Undefined, null and `""` all mean "leave the stored value alone".
pub(crate) fn update_value(value: MaybeUndefined<String>) -> Option<String> {
    value.take().filter(|v| !v.is_empty())
}

/// Build the store query for the `feed` arguments
pub(crate) fn build_link_query(
    filter: Option<String>,
    order_by: Option<Vec<LinkOrderByInput>>,
    skip: Option<i32>,
    take: Option<i32>,
) -> Result<LinkQuery, ApiError> {
    let mut query = LinkQuery::new();

    if let Some(filter) = filter {
        query = query.filter(filter);
    }

    for input in order_by.iter().flatten() {
        if let Some(order) = input.order()? {
            query = query.order_by(order);
        }
    }

    if let Some(skip) = skip {
        query = query.skip(i64::from(skip))?;
    }

    if let Some(take) = take {
        query = query.take(i64::from(take));
    }

    Ok(query)
}
