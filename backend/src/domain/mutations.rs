//! Mutation pipeline: write operations and their side effects.
//!
//! Every mutation is a single-shot transition. Atomicity is best-effort:
//! one store operation per mutation, no cross-collection transaction.
//! Within `post_photo` the insert strictly precedes the publish.

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::domain::context::RequestContext;
use crate::domain::error::GatewayError;
use crate::domain::photo::{Photo, PhotoDraft, PhotoId};
use crate::domain::ports::CodeExchange;
use crate::domain::tag::Tag;
use crate::domain::user::{AuthPayload, User};
use crate::notify::topics;

/// Insert a new photo owned by the current user and fan it out on the
/// `photo-added` topic. The publish happens synchronously after the insert
/// and before the response; it cannot fail (zero subscribers is a no-op),
/// so the mutation reports success once the photo is durably stored.
pub async fn post_photo(
    ctx: &RequestContext,
    draft: PhotoDraft,
) -> Result<Photo, GatewayError> {
    let Some(user) = ctx.current_user.as_ref() else {
        return Err(GatewayError::unauthorized("post a photo"));
    };

    let mut photo = Photo::from_draft(draft, user.github_login.clone(), Utc::now());
    let id = ctx.store.insert_photo(&photo).await?;
    photo.stored_id = Some(id);

    let delivered = ctx.notify.publish(topics::PHOTO_ADDED, photo.clone());
    debug!(topic = topics::PHOTO_ADDED, delivered, "photo fan-out");

    Ok(photo)
}

/// Insert a tag row unconditionally (duplicates allowed), then return the
/// photo read back by id. A dangling photo id yields `None`, not an error.
pub async fn tag_photo(
    ctx: &RequestContext,
    photo_id: &PhotoId,
    github_login: &str,
) -> Result<Option<Photo>, GatewayError> {
    if ctx.current_user.is_none() {
        return Err(GatewayError::unauthorized("tag a photo"));
    }

    let tag = Tag::new(photo_id.clone(), github_login);
    ctx.store.insert_tag(&tag).await?;
    Ok(ctx.store.photo_by_id(photo_id).await?)
}

/// Exchange an authorization code at the identity provider, then upsert the
/// user keyed by login with the latest profile and token (full overwrite).
/// A denied exchange touches no record.
pub async fn github_auth(
    ctx: &RequestContext,
    code: &str,
) -> Result<AuthPayload, GatewayError> {
    let profile = match ctx.identity.exchange_code(code).await? {
        CodeExchange::Granted(profile) => profile,
        CodeExchange::Denied { message } => {
            return Err(GatewayError::external_auth(message));
        }
    };

    let record = User {
        github_login: profile.login,
        name: profile.name,
        avatar: profile.avatar_url,
        github_token: profile.access_token.clone(),
        created: Utc::now(),
    };
    let user = ctx.store.upsert_user(&record).await?;

    Ok(AuthPayload {
        token: profile.access_token,
        user,
    })
}

/// Seeding utility: bulk-insert `count` generated users with random tokens.
pub async fn add_fake_users(
    ctx: &RequestContext,
    count: u32,
) -> Result<Vec<User>, GatewayError> {
    const FIRST_NAMES: &[&str] = &["ada", "grace", "edsger", "barbara", "tony", "radia"];
    const LAST_NAMES: &[&str] = &["finch", "hopper", "wren", "liskov", "stone", "perl"];

    let mut rng = SmallRng::from_entropy();
    let users: Vec<User> = (0..count)
        .map(|n| {
            let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            let token: u128 = rng.gen_range(0..=u128::MAX);
            User::new(format!("{first}-{last}-{n}"), format!("{token:032x}"))
                .with_name(format!("{first} {last}"))
        })
        .collect();

    ctx.store.insert_users(&users).await?;
    Ok(users)
}

/// Lookup-only auth for seeded users; fails with `NotFound` for an unknown
/// login.
pub async fn fake_user_auth(
    ctx: &RequestContext,
    github_login: &str,
) -> Result<AuthPayload, GatewayError> {
    let Some(user) = ctx.store.user_by_login(github_login).await? else {
        return Err(GatewayError::not_found(format!(
            "cannot find user with githubLogin \"{github_login}\""
        )));
    };

    Ok(AuthPayload {
        token: user.github_token.clone(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::StreamExt;

    use super::*;
    use crate::domain::error::GatewayError;
    use crate::domain::photo::PhotoCategory;
    use crate::domain::ports::{
        DocumentStore, GithubProfile, IdentityProvider, MockDocumentStore, MockIdentityProvider,
    };
    use crate::notify::NotificationBus;

    fn context(
        store: MockDocumentStore,
        identity: MockIdentityProvider,
        current_user: Option<User>,
    ) -> RequestContext {
        RequestContext {
            store: Arc::new(store) as Arc<dyn DocumentStore>,
            current_user,
            notify: NotificationBus::new(),
            identity: Arc::new(identity) as Arc<dyn IdentityProvider>,
        }
    }

    fn draft(name: &str) -> PhotoDraft {
        PhotoDraft {
            name: name.into(),
            category: PhotoCategory::default(),
            description: None,
        }
    }

    #[tokio::test]
    async fn post_photo_requires_a_current_user() {
        let mut store = MockDocumentStore::new();
        store.expect_insert_photo().never();
        let ctx = context(store, MockIdentityProvider::new(), None);

        let error = post_photo(&ctx, draft("sunset"))
            .await
            .expect_err("unauthenticated post must fail");
        assert!(matches!(error, GatewayError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn post_photo_inserts_then_publishes() {
        let mut store = MockDocumentStore::new();
        store
            .expect_insert_photo()
            .withf(|photo| photo.posted_by == "alice" && photo.stored_id.is_none())
            .once()
            .returning(|_| Ok(PhotoId::new("p1")));
        let ctx = context(
            store,
            MockIdentityProvider::new(),
            Some(User::new("alice", "t-alice")),
        );
        let mut subscription = ctx.notify.subscribe(topics::PHOTO_ADDED);

        let photo = post_photo(&ctx, draft("sunset")).await.expect("post");
        assert_eq!(photo.stored_id, Some(PhotoId::new("p1")));
        assert_eq!(photo.posted_by, "alice");

        let published = subscription.next().await.expect("one fan-out payload");
        assert_eq!(published, photo);
    }

    #[tokio::test]
    async fn tag_photo_requires_a_current_user() {
        let mut store = MockDocumentStore::new();
        store.expect_insert_tag().never();
        let ctx = context(store, MockIdentityProvider::new(), None);

        let error = tag_photo(&ctx, &PhotoId::new("p1"), "bob")
            .await
            .expect_err("unauthenticated tag must fail");
        assert!(matches!(error, GatewayError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn tag_photo_inserts_without_duplicate_check() {
        let mut store = MockDocumentStore::new();
        store
            .expect_insert_tag()
            .withf(|tag| tag.photo_id == PhotoId::new("p1") && tag.user_login == "bob")
            .times(2)
            .returning(|_| Ok(()));
        store
            .expect_photo_by_id()
            .times(2)
            .returning(|_| Ok(None));
        let ctx = context(
            store,
            MockIdentityProvider::new(),
            Some(User::new("alice", "t-alice")),
        );

        for _ in 0..2 {
            let read_back = tag_photo(&ctx, &PhotoId::new("p1"), "bob")
                .await
                .expect("tag insert");
            assert!(read_back.is_none(), "dangling photo id reads back as None");
        }
    }

    #[tokio::test]
    async fn github_auth_denied_writes_nothing() {
        let mut store = MockDocumentStore::new();
        store.expect_upsert_user().never();
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_exchange_code()
            .withf(|code| code == "bad")
            .once()
            .returning(|_| {
                Ok(CodeExchange::Denied {
                    message: "invalid code".into(),
                })
            });
        let ctx = context(store, identity, None);

        let error = github_auth(&ctx, "bad")
            .await
            .expect_err("denied exchange must fail");
        assert_eq!(
            error,
            GatewayError::external_auth("invalid code"),
            "provider message is carried verbatim"
        );
    }

    #[tokio::test]
    async fn github_auth_granted_upserts_and_returns_the_token() {
        let mut store = MockDocumentStore::new();
        store
            .expect_upsert_user()
            .withf(|user| user.github_login == "carol" && user.github_token == "gh-token")
            .once()
            .returning(|user| Ok(user.clone()));
        let mut identity = MockIdentityProvider::new();
        identity.expect_exchange_code().once().returning(|_| {
            Ok(CodeExchange::Granted(GithubProfile {
                login: "carol".into(),
                name: Some("Carol".into()),
                avatar_url: None,
                access_token: "gh-token".into(),
            }))
        });
        let ctx = context(store, identity, None);

        let payload = github_auth(&ctx, "good").await.expect("auth");
        assert_eq!(payload.token, "gh-token");
        assert_eq!(payload.user.github_login, "carol");
    }

    #[tokio::test]
    async fn fake_user_auth_unknown_login_is_not_found() {
        let mut store = MockDocumentStore::new();
        store
            .expect_user_by_login()
            .withf(|login| login == "nobody")
            .once()
            .returning(|_| Ok(None));
        let ctx = context(store, MockIdentityProvider::new(), None);

        let error = fake_user_auth(&ctx, "nobody")
            .await
            .expect_err("unknown login must fail");
        assert!(matches!(error, GatewayError::NotFound { .. }));
        assert!(error.to_string().contains("nobody"));
    }

    #[tokio::test]
    async fn add_fake_users_bulk_inserts_the_requested_count() {
        let mut store = MockDocumentStore::new();
        store
            .expect_insert_users()
            .withf(|users| users.len() == 3)
            .once()
            .returning(|_| Ok(()));
        let ctx = context(store, MockIdentityProvider::new(), None);

        let users = add_fake_users(&ctx, 3).await.expect("seed");
        assert_eq!(users.len(), 3);
    }
}
