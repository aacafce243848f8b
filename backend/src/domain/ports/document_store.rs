//! Port abstraction over the flat document store.
//!
//! The store holds three collections (`users`, `photos`, `tags`) and offers
//! count estimates, equality-filtered finds, inserts, and a replace-with-
//! upsert. No transactions and no joins: relationship resolution happens in
//! the domain layer on top of these primitives.

use async_trait::async_trait;

use crate::domain::photo::{Photo, PhotoId};
use crate::domain::tag::Tag;
use crate::domain::user::User;

/// Failures raised by document-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store connection could not be established.
    #[error("document store connection failed: {message}")]
    Connection { message: String },
    /// A find or write failed during execution.
    #[error("document store query failed: {message}")]
    Query { message: String },
}

/// Key-mapping collection access, equality lookups only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Count estimate for the `users` collection.
    async fn total_users(&self) -> Result<u64, StoreError>;

    /// Count estimate for the `photos` collection.
    async fn total_photos(&self) -> Result<u64, StoreError>;

    /// Every user record, in insertion order.
    async fn all_users(&self) -> Result<Vec<User>, StoreError>;

    /// Every photo record, in insertion order.
    async fn all_photos(&self) -> Result<Vec<Photo>, StoreError>;

    /// Find-one by login handle.
    async fn user_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    /// Find-one by stored credential token; backs the context builder.
    async fn user_by_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Find-one by photo identifier (stored or logical).
    async fn photo_by_id(&self, id: &PhotoId) -> Result<Option<Photo>, StoreError>;

    /// Photos whose owner handle equals `login`, in insertion order.
    async fn photos_by_owner(&self, login: &str) -> Result<Vec<Photo>, StoreError>;

    /// Tag rows referencing the photo, in insertion order.
    async fn tags_by_photo(&self, id: &PhotoId) -> Result<Vec<Tag>, StoreError>;

    /// Tag rows referencing the user, in insertion order.
    async fn tags_by_user(&self, login: &str) -> Result<Vec<Tag>, StoreError>;

    /// Insert one photo and return the store-issued identifier.
    async fn insert_photo(&self, photo: &Photo) -> Result<PhotoId, StoreError>;

    /// Insert one tag row. No duplicate check.
    async fn insert_tag(&self, tag: &Tag) -> Result<(), StoreError>;

    /// Bulk insert of user records.
    async fn insert_users(&self, users: &[User]) -> Result<(), StoreError>;

    /// Replace-with-upsert keyed by login handle; full record overwrite.
    /// Returns the record as stored.
    async fn upsert_user(&self, user: &User) -> Result<User, StoreError>;
}
