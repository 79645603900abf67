//! Remote document persistence

pub mod codec;
pub mod ports;

pub use ports::{Document, DocumentStore, FieldFilter, StoredDocument};
