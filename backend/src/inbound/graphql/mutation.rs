//! Mutation root resolvers, delegating to the domain mutation pipeline.

use async_graphql::{Context, ErrorExtensions, ID, Object, Result};

use crate::domain::{RequestContext, mutations};
use crate::inbound::graphql::types::{
    AuthPayloadObject, PhotoObject, PostPhotoInput, UserObject, parse_photo_id,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Post a photo owned by the current user and fan it out to `newPhoto`
    /// subscribers.
    async fn post_photo(&self, ctx: &Context<'_>, input: PostPhotoInput) -> Result<PhotoObject> {
        let request = ctx.data::<RequestContext>()?;
        let photo = mutations::post_photo(request, input.into_draft())
            .await
            .map_err(|error| error.extend())?;
        Ok(photo.into())
    }

    /// Tag a user in a photo. Duplicate tags are allowed; the photo is read
    /// back by id and may be null when the id dangles.
    async fn tag_photo(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "photoID")] photo_id: ID,
        github_login: String,
    ) -> Result<Option<PhotoObject>> {
        let request = ctx.data::<RequestContext>()?;
        let photo = mutations::tag_photo(request, &parse_photo_id(&photo_id), &github_login)
            .await
            .map_err(|error| error.extend())?;
        Ok(photo.map(PhotoObject::from))
    }

    /// Exchange a GitHub authorization code and upsert the user.
    async fn github_auth(&self, ctx: &Context<'_>, code: String) -> Result<AuthPayloadObject> {
        let request = ctx.data::<RequestContext>()?;
        let payload = mutations::github_auth(request, &code)
            .await
            .map_err(|error| error.extend())?;
        Ok(payload.into())
    }

    /// Seeding utility: bulk-insert generated users.
    async fn add_fake_users(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 1)] count: u32,
    ) -> Result<Vec<UserObject>> {
        let request = ctx.data::<RequestContext>()?;
        let users = mutations::add_fake_users(request, count)
            .await
            .map_err(|error| error.extend())?;
        Ok(users.into_iter().map(UserObject::from).collect())
    }

    /// Auth as a seeded user by login, without a provider round-trip.
    async fn fake_user_auth(
        &self,
        ctx: &Context<'_>,
        github_login: String,
    ) -> Result<AuthPayloadObject> {
        let request = ctx.data::<RequestContext>()?;
        let payload = mutations::fake_user_auth(request, &github_login)
            .await
            .map_err(|error| error.extend())?;
        Ok(payload.into())
    }
}
