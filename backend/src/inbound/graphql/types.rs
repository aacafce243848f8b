//! GraphQL object, enum, and input types over the domain entities.
//!
//! Thin wrappers keep the domain transport-agnostic: entity fields map
//! one-to-one, and relationship fields delegate to the domain resolver set
//! lazily, only when a query selects them.

use async_graphql::{Context, ErrorExtensions, ID, InputObject, Object, Result, SimpleObject};

use crate::domain::photo::PhotoId;
use crate::domain::{
    AuthPayload, GatewayError, Photo, PhotoCategory, PhotoDraft, RequestContext, User, relations,
};
use crate::inbound::graphql::scalar::DateTimeScalar;

/// Category tag exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, async_graphql::Enum)]
#[graphql(name = "PhotoCategory")]
pub enum PhotoCategoryValue {
    Selfie,
    Portrait,
    Action,
    Landscape,
    Graphic,
}

impl From<PhotoCategory> for PhotoCategoryValue {
    fn from(category: PhotoCategory) -> Self {
        match category {
            PhotoCategory::Selfie => Self::Selfie,
            PhotoCategory::Portrait => Self::Portrait,
            PhotoCategory::Action => Self::Action,
            PhotoCategory::Landscape => Self::Landscape,
            PhotoCategory::Graphic => Self::Graphic,
        }
    }
}

impl From<PhotoCategoryValue> for PhotoCategory {
    fn from(category: PhotoCategoryValue) -> Self {
        match category {
            PhotoCategoryValue::Selfie => Self::Selfie,
            PhotoCategoryValue::Portrait => Self::Portrait,
            PhotoCategoryValue::Action => Self::Action,
            PhotoCategoryValue::Landscape => Self::Landscape,
            PhotoCategoryValue::Graphic => Self::Graphic,
        }
    }
}

/// Input for `postPhoto`; category defaults to `PORTRAIT` when omitted.
#[derive(Debug, InputObject)]
#[graphql(name = "PostPhotoInput")]
pub struct PostPhotoInput {
    pub name: String,
    pub category: Option<PhotoCategoryValue>,
    pub description: Option<String>,
}

impl PostPhotoInput {
    pub fn into_draft(self) -> PhotoDraft {
        PhotoDraft {
            name: self.name,
            category: self.category.map_or_else(PhotoCategory::default, Into::into),
            description: self.description,
        }
    }
}

/// Photo content record.
pub struct PhotoObject {
    photo: Photo,
}

impl From<Photo> for PhotoObject {
    fn from(photo: Photo) -> Self {
        Self { photo }
    }
}

#[Object(name = "Photo")]
impl PhotoObject {
    /// Logical identifier when the caller supplied one, else the
    /// store-assigned identifier.
    async fn id(&self) -> Option<ID> {
        self.photo.identifier().map(|id| ID(id.to_string()))
    }

    /// Derived asset URL; absent for records not yet inserted.
    async fn url(&self) -> Option<String> {
        self.photo.url()
    }

    async fn name(&self) -> &str {
        &self.photo.name
    }

    async fn description(&self) -> Option<&str> {
        self.photo.description.as_deref()
    }

    async fn category(&self) -> PhotoCategoryValue {
        self.photo.category.into()
    }

    async fn created(&self) -> DateTimeScalar {
        DateTimeScalar(self.photo.created)
    }

    /// Owning user; null when the owner handle no longer resolves.
    async fn posted_by(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let request = ctx.data::<RequestContext>()?;
        let owner = relations::photo_owner(request.store.as_ref(), &self.photo)
            .await
            .map_err(|error| GatewayError::from(error).extend())?;
        Ok(owner.map(UserObject::from))
    }

    /// Users appearing in this photo; duplicates preserved, dangling tag
    /// rows skipped.
    async fn tagged_users(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let request = ctx.data::<RequestContext>()?;
        let users = relations::tagged_users(request.store.as_ref(), &self.photo)
            .await
            .map_err(|error| GatewayError::from(error).extend())?;
        Ok(users.into_iter().map(UserObject::from).collect())
    }
}

/// User identity record. The stored credential token is never exposed here.
pub struct UserObject {
    user: User,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self { user }
    }
}

#[Object(name = "User")]
impl UserObject {
    async fn github_login(&self) -> ID {
        ID(self.user.github_login.clone())
    }

    async fn name(&self) -> Option<&str> {
        self.user.name.as_deref()
    }

    async fn avatar(&self) -> Option<&str> {
        self.user.avatar.as_deref()
    }

    /// Photos owned by this user.
    async fn posted_photos(&self, ctx: &Context<'_>) -> Result<Vec<PhotoObject>> {
        let request = ctx.data::<RequestContext>()?;
        let photos = relations::posted_photos(request.store.as_ref(), &self.user)
            .await
            .map_err(|error| GatewayError::from(error).extend())?;
        Ok(photos.into_iter().map(PhotoObject::from).collect())
    }

    /// Photos this user appears in.
    async fn in_photos(&self, ctx: &Context<'_>) -> Result<Vec<PhotoObject>> {
        let request = ctx.data::<RequestContext>()?;
        let photos = relations::photos_featuring(request.store.as_ref(), &self.user)
            .await
            .map_err(|error| GatewayError::from(error).extend())?;
        Ok(photos.into_iter().map(PhotoObject::from).collect())
    }
}

/// Result of a successful auth mutation.
#[derive(SimpleObject)]
#[graphql(name = "AuthPayload")]
pub struct AuthPayloadObject {
    pub token: String,
    pub user: UserObject,
}

impl From<AuthPayload> for AuthPayloadObject {
    fn from(payload: AuthPayload) -> Self {
        Self {
            token: payload.token,
            user: payload.user.into(),
        }
    }
}

pub(super) fn parse_photo_id(id: &ID) -> PhotoId {
    PhotoId::new(id.0.clone())
}
