use super::prelude::*;

#[derive(Default)]
pub struct LinkQueries;

#[Object]
impl LinkQueries {
    /// Filtered, ordered page of links plus the total matching count
    async fn feed(
        &self,
        ctx: &Context<'_>,
        filter: Option<String>,
        order_by: Option<Vec<LinkOrderByInput>>,
        skip: Option<i32>,
        take: Option<i32>,
    ) -> Result<Feed> {
        ctx.auth_user()?;
        let store = ctx.data_unchecked::<Arc<dyn LinkStore>>();

        let query = build_link_query(filter, order_by, skip, take).map_err(|e| e.extend())?;

        // Page and count are independent reads; a concurrent write may skew them
        let (records, count) = futures::try_join!(store.find_many(&query), store.count(&query))
            .map_err(storage_error)?;

        Ok(Feed {
            links: records.into_iter().map(link_record_to_graphql).collect(),
            count: i32::try_from(count).unwrap_or(i32::MAX),
        })
    }

    /// Get a link by ID, null if it does not exist
    async fn link(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Link>> {
        ctx.auth_user()?;
        let store = ctx.data_unchecked::<Arc<dyn LinkStore>>();

        let record = store.find_by_id(id).await.map_err(storage_error)?;

        Ok(record.map(link_record_to_graphql))
    }
}
