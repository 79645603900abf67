//! # SkyTrack Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Document stores (in-memory and SQLite)
//! - An in-process identity provider with argon2 credential hashes
//! - Device preference stores (in-memory and JSON file)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `skytrack-core`
//! - Depends on `skytrack-domain` and `skytrack-core`
//! - Contains all "impure" code (I/O, file system, SQLite)

pub mod config;
pub mod database;
pub mod errors;
pub mod identity;
pub mod memory;
pub mod preferences;

// Re-export commonly used items
pub use database::{DbManager, SqliteDocumentStore};
pub use errors::InfraError;
pub use identity::InMemoryIdentityProvider;
pub use memory::InMemoryDocumentStore;
pub use preferences::{InMemoryPreferenceStore, JsonFilePreferenceStore};
