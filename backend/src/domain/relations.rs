//! Relationship resolvers: graph edges the document store does not join.
//!
//! Each resolver is a pure function from an entity (plus the store handle)
//! to its related entities, evaluated lazily only when a query selects the
//! field. A missing single entity resolves to `None`, never an error;
//! dangling references inside a list are skipped. List order mirrors store
//! insertion order and duplicates are preserved.

use crate::domain::photo::Photo;
use crate::domain::ports::{DocumentStore, StoreError};
use crate::domain::user::User;

/// `Photo -> owner`: single lookup by the stored owner handle.
pub async fn photo_owner(
    store: &dyn DocumentStore,
    photo: &Photo,
) -> Result<Option<User>, StoreError> {
    store.user_by_login(&photo.posted_by).await
}

/// `Photo -> taggedUsers`: two-stage join. Fetch the tag rows referencing
/// the photo, project to login handles, then fetch each user.
pub async fn tagged_users(
    store: &dyn DocumentStore,
    photo: &Photo,
) -> Result<Vec<User>, StoreError> {
    let Some(id) = photo.identifier() else {
        return Ok(Vec::new());
    };

    let tags = store.tags_by_photo(id).await?;
    let mut users = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(user) = store.user_by_login(&tag.user_login).await? {
            users.push(user);
        }
    }
    Ok(users)
}

/// `User -> postedPhotos`: photos whose owner handle equals the user's.
pub async fn posted_photos(
    store: &dyn DocumentStore,
    user: &User,
) -> Result<Vec<Photo>, StoreError> {
    store.photos_by_owner(&user.github_login).await
}

/// `User -> inPhotos`: two-stage join symmetric to [`tagged_users`].
pub async fn photos_featuring(
    store: &dyn DocumentStore,
    user: &User,
) -> Result<Vec<Photo>, StoreError> {
    let tags = store.tags_by_user(&user.github_login).await?;
    let mut photos = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(photo) = store.photo_by_id(&tag.photo_id).await? {
            photos.push(photo);
        }
    }
    Ok(photos)
}
