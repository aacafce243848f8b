//! In-memory document store over three flat collections.
//!
//! Backs local runs and tests. Collections are plain vectors guarded by one
//! lock, so conflicting writes serialize; lookups are linear equality scans,
//! matching the store contract (no secondary indexes beyond equality).

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::photo::{Photo, PhotoId};
use crate::domain::ports::{DocumentStore, StoreError};
use crate::domain::tag::Tag;
use crate::domain::user::User;

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    photos: Vec<Photo>,
    tags: Vec<Tag>,
}

/// Infallible store keeping everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Collections>,
}

impl MemoryDocumentStore {
    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> T {
        f(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> T {
        f(&mut self.inner.write().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn total_users(&self) -> Result<u64, StoreError> {
        Ok(self.read(|c| c.users.len() as u64))
    }

    async fn total_photos(&self) -> Result<u64, StoreError> {
        Ok(self.read(|c| c.photos.len() as u64))
    }

    async fn all_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read(|c| c.users.clone()))
    }

    async fn all_photos(&self) -> Result<Vec<Photo>, StoreError> {
        Ok(self.read(|c| c.photos.clone()))
    }

    async fn user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read(|c| {
            c.users
                .iter()
                .find(|user| user.github_login == login)
                .cloned()
        }))
    }

    async fn user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read(|c| {
            c.users
                .iter()
                .find(|user| user.github_token == token)
                .cloned()
        }))
    }

    async fn photo_by_id(&self, id: &PhotoId) -> Result<Option<Photo>, StoreError> {
        Ok(self.read(|c| {
            c.photos
                .iter()
                .find(|photo| {
                    photo.stored_id.as_ref() == Some(id) || photo.id.as_ref() == Some(id)
                })
                .cloned()
        }))
    }

    async fn photos_by_owner(&self, login: &str) -> Result<Vec<Photo>, StoreError> {
        Ok(self.read(|c| {
            c.photos
                .iter()
                .filter(|photo| photo.posted_by == login)
                .cloned()
                .collect()
        }))
    }

    async fn tags_by_photo(&self, id: &PhotoId) -> Result<Vec<Tag>, StoreError> {
        Ok(self.read(|c| {
            c.tags
                .iter()
                .filter(|tag| &tag.photo_id == id)
                .cloned()
                .collect()
        }))
    }

    async fn tags_by_user(&self, login: &str) -> Result<Vec<Tag>, StoreError> {
        Ok(self.read(|c| {
            c.tags
                .iter()
                .filter(|tag| tag.user_login == login)
                .cloned()
                .collect()
        }))
    }

    async fn insert_photo(&self, photo: &Photo) -> Result<PhotoId, StoreError> {
        let id = PhotoId::new(Uuid::new_v4().to_string());
        let mut stored = photo.clone();
        stored.stored_id = Some(id.clone());
        self.write(|c| c.photos.push(stored));
        Ok(id)
    }

    async fn insert_tag(&self, tag: &Tag) -> Result<(), StoreError> {
        self.write(|c| c.tags.push(tag.clone()));
        Ok(())
    }

    async fn insert_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.write(|c| c.users.extend_from_slice(users));
        Ok(())
    }

    async fn upsert_user(&self, user: &User) -> Result<User, StoreError> {
        self.write(|c| {
            match c
                .users
                .iter_mut()
                .find(|existing| existing.github_login == user.github_login)
            {
                Some(existing) => *existing = user.clone(),
                None => c.users.push(user.clone()),
            }
        });
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::photo::{PhotoCategory, PhotoDraft};

    fn photo(name: &str, owner: &str) -> Photo {
        Photo::from_draft(
            PhotoDraft {
                name: name.into(),
                category: PhotoCategory::default(),
                description: None,
            },
            owner,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_photo_assigns_a_fresh_identifier() {
        let store = MemoryDocumentStore::default();
        let first = store.insert_photo(&photo("a", "alice")).await.expect("insert");
        let second = store.insert_photo(&photo("b", "alice")).await.expect("insert");
        assert_ne!(first, second);

        let found = store.photo_by_id(&first).await.expect("find");
        assert_eq!(found.map(|p| p.name).as_deref(), Some("a"));
        assert_eq!(store.total_photos().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn photo_by_id_also_matches_logical_ids() {
        let store = MemoryDocumentStore::default();
        let mut record = photo("a", "alice");
        record.id = Some(PhotoId::new("logical-1"));
        store.insert_photo(&record).await.expect("insert");

        let found = store
            .photo_by_id(&PhotoId::new("logical-1"))
            .await
            .expect("find");
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn upsert_replaces_the_whole_record_by_login() {
        let store = MemoryDocumentStore::default();
        store
            .upsert_user(&User::new("alice", "t-old").with_name("Old Name"))
            .await
            .expect("insert");
        store
            .upsert_user(&User::new("alice", "t-new"))
            .await
            .expect("replace");

        assert_eq!(store.total_users().await.expect("count"), 1);
        let alice = store
            .user_by_login("alice")
            .await
            .expect("find")
            .expect("alice exists");
        assert_eq!(alice.github_token, "t-new");
        assert_eq!(alice.name, None, "replace semantics, not merge");
        assert!(store.user_by_token("t-old").await.expect("find").is_none());
    }

    #[tokio::test]
    async fn tag_rows_keep_insertion_order_and_duplicates() {
        let store = MemoryDocumentStore::default();
        let id = PhotoId::new("p1");
        for login in ["bob", "bob", "carol"] {
            store
                .insert_tag(&Tag::new(id.clone(), login))
                .await
                .expect("insert");
        }

        let logins: Vec<String> = store
            .tags_by_photo(&id)
            .await
            .expect("find")
            .into_iter()
            .map(|tag| tag.user_login)
            .collect();
        assert_eq!(logins, ["bob", "bob", "carol"]);
        assert_eq!(store.tags_by_user("bob").await.expect("find").len(), 2);
    }
}
