//! Per-request context construction.

use std::sync::Arc;

use crate::domain::error::GatewayError;
use crate::domain::photo::Photo;
use crate::domain::ports::{DocumentStore, IdentityProvider};
use crate::domain::user::User;
use crate::notify::NotificationBus;

/// Long-lived gateway wiring shared by every request and connection.
#[derive(Clone)]
pub struct GatewayState {
    store: Arc<dyn DocumentStore>,
    notify: NotificationBus<Photo>,
    identity: Arc<dyn IdentityProvider>,
}

impl GatewayState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notify: NotificationBus<Photo>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            notify,
            identity,
        }
    }

    /// Bus handle, for callers that publish outside a request context.
    pub fn notify(&self) -> &NotificationBus<Photo> {
        &self.notify
    }

    /// Context builder: derive the per-request principal from a credential.
    ///
    /// A missing credential, or one matching no stored token, yields an
    /// unauthenticated context (`current_user = None`). That is the normal
    /// state for read access, not an error; mutations enforce authorization
    /// individually. Only store failures propagate.
    pub async fn request_context(
        &self,
        credential: Option<&str>,
    ) -> Result<RequestContext, GatewayError> {
        let current_user = match credential {
            Some(token) => self.store.user_by_token(token).await?,
            None => None,
        };
        Ok(RequestContext {
            store: Arc::clone(&self.store),
            current_user,
            notify: self.notify.clone(),
            identity: Arc::clone(&self.identity),
        })
    }
}

/// Ephemeral per-request/connection context: store handle, resolved current
/// user (or absent), and the notification bus. Discarded at request end,
/// never persisted.
pub struct RequestContext {
    pub store: Arc<dyn DocumentStore>,
    pub current_user: Option<User>,
    pub notify: NotificationBus<Photo>,
    pub identity: Arc<dyn IdentityProvider>,
}
