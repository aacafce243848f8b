//! Mapping from domain errors to GraphQL field errors.

use async_graphql::ErrorExtensions;

use crate::domain::GatewayError;

impl ErrorExtensions for GatewayError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, extensions| extensions.set("code", self.code()))
    }
}
