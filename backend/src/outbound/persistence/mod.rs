//! Document-store adapters.

mod memory_store;

pub use memory_store::MemoryDocumentStore;
