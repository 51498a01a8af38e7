//! GraphQL type definitions
//!
//! These types mirror the database records but are decorated with
//! async-graphql attributes. Relations on [`Link`] go through the batched
//! loaders in [`super::loaders`].

use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{LinkOrder, LinkQueryError, LinkSortField, SortDirection};

use super::loaders::{PostedByLoader, VotersLoader};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, Serialize, Deserialize)]
#[graphql(rename_items = "lowercase")]
pub enum Sort {
    Asc,
    Desc,
}

impl From<Sort> for SortDirection {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Asc => SortDirection::Asc,
            Sort::Desc => SortDirection::Desc,
        }
    }
}

/// One feed ordering entry.
///
/// Names a single field; list several entries for a multi-key sort.
/// An entry with no field set contributes nothing.
#[derive(Debug, Clone, Default, InputObject)]
pub struct LinkOrderByInput {
    pub description: Option<Sort>,
    pub url: Option<Sort>,
    pub created_at: Option<Sort>,
}

impl LinkOrderByInput {
    pub fn order(&self) -> Result<Option<LinkOrder>, LinkQueryError> {
        let mut set = [
            (LinkSortField::Description, self.description),
            (LinkSortField::Url, self.url),
            (LinkSortField::CreatedAt, self.created_at),
        ]
        .into_iter()
        .filter_map(|(field, sort)| sort.map(|s| LinkOrder::new(field, s.into())));

        match (set.next(), set.count()) {
            (order, 0) => Ok(order),
            (_, rest) => Err(LinkQueryError::MultipleSortFields(rest + 1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// A submitted link
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject, Serialize, Deserialize)]
#[graphql(complex)]
pub struct Link {
    pub id: i32,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[ComplexObject]
impl Link {
    /// The user who posted the link, null once that user is gone
    async fn posted_by(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loader = ctx.data_unchecked::<DataLoader<PostedByLoader>>();
        Ok(loader.load_one(self.id).await?)
    }

    async fn voters(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loader = ctx.data_unchecked::<DataLoader<VotersLoader>>();
        Ok(loader.load_one(self.id).await?.unwrap_or_default())
    }
}

/// A page of links plus the number of links matching the filter
#[derive(Debug, Clone, SimpleObject)]
pub struct Feed {
    pub links: Vec<Link>,
    /// Ignores skip and take
    pub count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_order_by_single_field() {
        let input = LinkOrderByInput {
            url: Some(Sort::Desc),
            ..Default::default()
        };
        assert_eq!(
            input.order().unwrap(),
            Some(LinkOrder::new(LinkSortField::Url, SortDirection::Desc))
        );

        assert_eq!(LinkOrderByInput::default().order().unwrap(), None);
    }

    #[test]
    fn test_order_by_rejects_several_fields() {
        let input = LinkOrderByInput {
            description: Some(Sort::Asc),
            url: Some(Sort::Desc),
            created_at: Some(Sort::Asc),
        };
        assert_matches!(input.order(), Err(LinkQueryError::MultipleSortFields(3)));
    }
}
