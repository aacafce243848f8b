//! GraphQL schema definition.
//!
//! This module contains the schema wiring, including:
//! - [`query`] / [`mutation`] / [`subscription`] — the root resolvers
//! - [`types`] — object, enum, and input types over the domain entities
//! - [`scalar`] — the `DateTime` custom scalar
//! - [`guard`] — pre-execution depth/cost validation
//!
//! Resolvers read the per-request [`crate::domain::RequestContext`] from the
//! engine's context data; the HTTP adapter inserts it fresh for every
//! request and connection.

pub mod error;
pub mod guard;
pub mod mutation;
pub mod query;
pub mod scalar;
pub mod subscription;
pub mod types;

use async_graphql::Schema;

pub use self::guard::{ShapeGuard, ShapeGuardConfig};
pub use self::mutation::MutationRoot;
pub use self::query::QueryRoot;
pub use self::subscription::SubscriptionRoot;

/// The executable schema for the PhotoShare gateway.
pub type GatewaySchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the schema with the query-shape guard in front of execution.
pub fn build_schema(guard: ShapeGuard) -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .extension(guard)
        .finish()
}
