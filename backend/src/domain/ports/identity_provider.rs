//! Port abstraction over the external identity provider.
//!
//! The upstream contract signals failure by the presence of a `message`
//! field rather than a distinct error channel. The port models that as a
//! tagged result instead: [`CodeExchange::Granted`] carries profile fields,
//! [`CodeExchange::Denied`] carries the provider's message. Callers never
//! infer failure from field absence.

use std::collections::HashMap;

use async_trait::async_trait;

/// Profile fields returned by a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubProfile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub access_token: String,
}

/// Outcome of exchanging an authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeExchange {
    Granted(GithubProfile),
    Denied { message: String },
}

/// Failures raised by identity-provider adapters before any outcome is
/// known, e.g. the provider was unreachable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    #[error("identity provider unreachable: {message}")]
    Transport { message: String },
}

/// One opaque network call: authorization code in, tagged outcome out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<CodeExchange, IdentityProviderError>;
}

/// In-memory provider for tests and local runs without GitHub credentials.
/// Codes registered via [`FixtureIdentityProvider::grant`] succeed; every
/// other code is denied with a provider-style message.
#[derive(Debug, Clone, Default)]
pub struct FixtureIdentityProvider {
    grants: HashMap<String, GithubProfile>,
}

impl FixtureIdentityProvider {
    #[must_use]
    pub fn grant(mut self, code: impl Into<String>, profile: GithubProfile) -> Self {
        self.grants.insert(code.into(), profile);
        self
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<CodeExchange, IdentityProviderError> {
        Ok(self.grants.get(code).cloned().map_or_else(
            || CodeExchange::Denied {
                message: format!("the code passed is incorrect or expired: {code}"),
            },
            CodeExchange::Granted,
        ))
    }
}
