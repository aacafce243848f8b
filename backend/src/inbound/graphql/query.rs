//! Query root resolvers.

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::domain::{GatewayError, RequestContext};
use crate::inbound::graphql::types::{PhotoObject, UserObject};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The authenticated user for this request, if any.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let request = ctx.data::<RequestContext>()?;
        Ok(request.current_user.clone().map(UserObject::from))
    }

    async fn total_photos(&self, ctx: &Context<'_>) -> Result<u64> {
        let request = ctx.data::<RequestContext>()?;
        request
            .store
            .total_photos()
            .await
            .map_err(|error| GatewayError::from(error).extend())
    }

    async fn all_photos(&self, ctx: &Context<'_>) -> Result<Vec<PhotoObject>> {
        let request = ctx.data::<RequestContext>()?;
        let photos = request
            .store
            .all_photos()
            .await
            .map_err(|error| GatewayError::from(error).extend())?;
        Ok(photos.into_iter().map(PhotoObject::from).collect())
    }

    async fn total_users(&self, ctx: &Context<'_>) -> Result<u64> {
        let request = ctx.data::<RequestContext>()?;
        request
            .store
            .total_users()
            .await
            .map_err(|error| GatewayError::from(error).extend())
    }

    async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let request = ctx.data::<RequestContext>()?;
        let users = request
            .store
            .all_users()
            .await
            .map_err(|error| GatewayError::from(error).extend())?;
        Ok(users.into_iter().map(UserObject::from).collect())
    }
}
