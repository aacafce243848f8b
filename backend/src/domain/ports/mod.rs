//! Domain ports for the hexagonal boundary.
//!
//! The document store and the identity provider are capability boundaries:
//! the core depends on these traits only, and outbound adapters supply the
//! concrete implementations.

mod document_store;
mod identity_provider;

#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, StoreError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    CodeExchange, FixtureIdentityProvider, GithubProfile, IdentityProvider, IdentityProviderError,
};
