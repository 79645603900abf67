//! Process-local adapters
//!
//! Used for the `memory` storage backend, demos and tests. Nothing survives
//! a restart.

pub mod document_store;

pub use document_store::InMemoryDocumentStore;
