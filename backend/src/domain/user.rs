//! User identity records and the auth payload returned by login mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity record keyed by the GitHub login handle.
///
/// ## Invariants
/// - `github_login` is unique in the store; auth flows upsert by login with
///   full-record replace semantics, so at most one record exists per handle.
/// - `github_token` is the opaque credential compared verbatim during
///   context building; it is never exposed through the API surface except as
///   the `token` field of [`AuthPayload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub github_login: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub github_token: String,
    pub created: DateTime<Utc>,
}

impl User {
    /// Minimal record with only the fields every user must carry.
    pub fn new(github_login: impl Into<String>, github_token: impl Into<String>) -> Self {
        Self {
            github_login: github_login.into(),
            name: None,
            avatar: None,
            github_token: github_token.into(),
            created: Utc::now(),
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Result of a successful auth mutation: the stored user plus the raw token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}
