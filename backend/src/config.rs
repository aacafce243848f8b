//! Gateway configuration.

use std::env;

use clap::Parser;
use tracing::warn;

/// Command-line options, with environment fallbacks for the OAuth secrets so
/// deployments can keep them out of process arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "photoshare-gateway", about = "GraphQL gateway for the PhotoShare API")]
pub struct GatewayConfig {
    /// Address the HTTP server binds to.
    #[arg(long, default_value = "0.0.0.0:4000")]
    pub bind: String,

    /// GitHub OAuth client id; falls back to `CLIENT_ID`.
    #[arg(long)]
    pub github_client_id: Option<String>,

    /// GitHub OAuth client secret; falls back to `CLIENT_SECRET`.
    #[arg(long)]
    pub github_client_secret: Option<String>,
}

impl GatewayConfig {
    /// Resolve the OAuth credential pair. Missing values degrade to empty
    /// strings, which the provider will reject at exchange time.
    pub fn github_credentials(&self) -> (String, String) {
        let client_id = self
            .github_client_id
            .clone()
            .or_else(|| env::var("CLIENT_ID").ok())
            .unwrap_or_default();
        let client_secret = self
            .github_client_secret
            .clone()
            .or_else(|| env::var("CLIENT_SECRET").ok())
            .unwrap_or_default();

        if client_id.is_empty() || client_secret.is_empty() {
            warn!("github OAuth credentials missing; githubAuth exchanges will be denied");
        }
        (client_id, client_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_win_over_the_environment() {
        let config = GatewayConfig {
            bind: "127.0.0.1:0".into(),
            github_client_id: Some("id-from-flag".into()),
            github_client_secret: Some("secret-from-flag".into()),
        };
        let (id, secret) = config.github_credentials();
        assert_eq!(id, "id-from-flag");
        assert_eq!(secret, "secret-from-flag");
    }

    #[test]
    fn defaults_parse_without_arguments() {
        let config = GatewayConfig::parse_from(["photoshare-gateway"]);
        assert_eq!(config.bind, "0.0.0.0:4000");
        assert!(config.github_client_id.is_none());
    }
}
