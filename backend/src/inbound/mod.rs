//! Inbound adapters translating transport requests into domain calls.

pub mod graphql;
pub mod http;
