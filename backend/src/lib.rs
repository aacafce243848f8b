//! PhotoShare gateway library modules.
//!
//! A GraphQL gateway in front of a flat document store for a photo-sharing
//! domain. The domain layer owns the relationship resolvers and the mutation
//! pipeline; inbound adapters translate GraphQL requests and WebSocket
//! subscriptions, outbound adapters implement the document-store and
//! identity-provider ports.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod notify;
pub mod outbound;
