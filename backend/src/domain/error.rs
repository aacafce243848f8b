//! Domain-level error taxonomy.
//!
//! These errors are transport agnostic. The GraphQL adapter maps them to
//! field-level errors carrying a stable machine-readable `code` extension;
//! sibling fields keep executing when one resolver fails.

use crate::domain::ports::{IdentityProviderError, StoreError};

/// Failure categories surfaced by the gateway core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// A mutation was attempted without a resolved current user.
    #[error("only an authorized user can {action}")]
    Unauthorized { action: String },
    /// A lookup mutation's target is absent.
    #[error("{message}")]
    NotFound { message: String },
    /// The identity provider returned an error instead of a token, or could
    /// not be reached at all.
    #[error("{message}")]
    ExternalAuthFailure { message: String },
    /// The query exceeded its shape limits and was rejected before execution.
    #[error("{message}")]
    ValidationRejected { message: String },
    /// An underlying store operation failed; propagated, never retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GatewayError {
    pub fn unauthorized(action: impl Into<String>) -> Self {
        Self::Unauthorized {
            action: action.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn external_auth(message: impl Into<String>) -> Self {
        Self::ExternalAuthFailure {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationRejected {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for adapters.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ExternalAuthFailure { .. } => "EXTERNAL_AUTH_FAILURE",
            Self::ValidationRejected { .. } => "VALIDATION_REJECTED",
            Self::Store(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl From<IdentityProviderError> for GatewayError {
    fn from(error: IdentityProviderError) -> Self {
        Self::ExternalAuthFailure {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GatewayError::unauthorized("post a photo"), "UNAUTHORIZED")]
    #[case(GatewayError::not_found("no such user"), "NOT_FOUND")]
    #[case(GatewayError::external_auth("bad code"), "EXTERNAL_AUTH_FAILURE")]
    #[case(GatewayError::validation("too deep"), "VALIDATION_REJECTED")]
    #[case(
        GatewayError::Store(StoreError::Query { message: "boom".into() }),
        "STORE_UNAVAILABLE"
    )]
    fn codes_are_stable(#[case] error: GatewayError, #[case] code: &str) {
        assert_eq!(error.code(), code);
    }

    #[test]
    fn unauthorized_message_names_the_action() {
        let error = GatewayError::unauthorized("tag a photo");
        assert_eq!(error.to_string(), "only an authorized user can tag a photo");
    }

    #[test]
    fn provider_errors_map_to_external_auth_failure() {
        let error: GatewayError = IdentityProviderError::Transport {
            message: "connection refused".into(),
        }
        .into();
        assert_eq!(error.code(), "EXTERNAL_AUTH_FAILURE");
    }
}
