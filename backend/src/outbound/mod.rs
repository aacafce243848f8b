//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations; they contain no business logic.
//!
//! - **persistence**: in-memory document store over three flat collections
//! - **github**: reqwest-backed identity provider

pub mod github;
pub mod persistence;
