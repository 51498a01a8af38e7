use super::prelude::*;

#[derive(Default)]
pub struct LinkMutations;

#[Object]
impl LinkMutations {
    /// Post a new link as the current user
    async fn create_link(
        &self,
        ctx: &Context<'_>,
        description: String,
        url: String,
    ) -> Result<Link> {
        let user = ctx.auth_user()?;
        let store = ctx.data_unchecked::<Arc<dyn LinkStore>>();

        let record = store
            .create(CreateLink {
                description,
                url,
                posted_by_id: user.user_id,
            })
            .await
            .map_err(storage_error)?;

        tracing::info!(link_id = record.id, user_id = user.user_id, "Link created");

        Ok(link_record_to_graphql(record))
    }

    /// Update a link. Omitted, null or empty fields keep their stored value.
    async fn update_link(
        &self,
        ctx: &Context<'_>,
        id: i32,
        description: MaybeUndefined<String>,
        url: MaybeUndefined<String>,
    ) -> Result<Link> {
        let user = ctx.auth_user()?;
        let store = ctx.data_unchecked::<Arc<dyn LinkStore>>();

        let input = UpdateLink {
            description: update_value(description),
            url: update_value(url),
        };
        if input.is_empty() {
            tracing::debug!(link_id = id, "Update without changes");
        }

        let record = store.update(id, input).await.map_err(storage_error)?;

        tracing::info!(link_id = id, user_id = user.user_id, "Link updated");

        Ok(link_record_to_graphql(record))
    }

    /// Delete a link, returning it as it was before removal
    async fn delete_link(&self, ctx: &Context<'_>, id: i32) -> Result<Link> {
        let user = ctx.auth_user()?;
        let store = ctx.data_unchecked::<Arc<dyn LinkStore>>();

        let record = store.delete(id).await.map_err(storage_error)?;

        tracing::info!(link_id = id, user_id = user.user_id, "Link deleted");

        Ok(link_record_to_graphql(record))
    }
}
