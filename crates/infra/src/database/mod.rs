//! SQLite-backed persistence

pub mod document_store;
pub mod manager;

pub use document_store::SqliteDocumentStore;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
