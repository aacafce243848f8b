//! Domain entities, ports, and services.
//!
//! Purpose: define the transport-agnostic core of the gateway. Entities are
//! plain records owned by the document store; the context builder derives the
//! per-request principal; `relations` resolves graph edges the store does not
//! join; `mutations` applies writes with their side effects. Inbound adapters
//! map these into GraphQL, outbound adapters implement the ports.

pub mod context;
pub mod error;
pub mod mutations;
pub mod photo;
pub mod ports;
pub mod relations;
pub mod tag;
pub mod user;

pub use self::context::{GatewayState, RequestContext};
pub use self::error::GatewayError;
pub use self::photo::{Photo, PhotoCategory, PhotoDraft, PhotoId};
pub use self::tag::Tag;
pub use self::user::{AuthPayload, User};
