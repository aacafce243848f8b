//! Reqwest-backed GitHub identity provider adapter.
//!
//! Owns transport details only: the token exchange request, the profile
//! fetch, and mapping the provider's message-on-failure contract into the
//! port's tagged [`CodeExchange`] result.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::{
    CodeExchange, GithubProfile, IdentityProvider, IdentityProviderError,
};

const ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_PROFILE_URL: &str = "https://api.github.com/user";
const USER_AGENT_VALUE: &str = "photoshare-gateway";

pub struct GithubIdentityProvider {
    http: Client,
    client_id: String,
    client_secret: String,
}

impl GithubIdentityProvider {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[derive(Serialize)]
struct TokenRequestDto<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// GitHub signals a failed exchange inside a 200 response: no
/// `access_token`, plus a human-readable message in one of two fields.
#[derive(Deserialize)]
struct TokenResponseDto {
    access_token: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct ProfileDto {
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
}

#[async_trait]
impl IdentityProvider for GithubIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<CodeExchange, IdentityProviderError> {
        let token: TokenResponseDto = self
            .http
            .post(ACCESS_TOKEN_URL)
            .header(ACCEPT, "application/json")
            .json(&TokenRequestDto {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                code,
            })
            .send()
            .await
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        let Some(access_token) = token.access_token else {
            let message = token
                .message
                .or(token.error_description)
                .unwrap_or_else(|| "identity provider rejected the code".to_owned());
            warn!(message, "github token exchange denied");
            return Ok(CodeExchange::Denied { message });
        };

        let profile: ProfileDto = self
            .http
            .get(USER_PROFILE_URL)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        Ok(CodeExchange::Granted(GithubProfile {
            login: profile.login,
            name: profile.name,
            avatar_url: profile.avatar_url,
            access_token,
        }))
    }
}

fn transport(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::Transport {
        message: error.to_string(),
    }
}
