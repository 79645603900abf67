//! # SkyTrack Domain
//!
//! Business domain types and models for SkyTrack.
//!
//! This crate contains:
//! - Entity records (classes, tasks, notes, contacts, events) with their
//!   creation drafts and partial-update patches
//! - The authenticated principal and its profile updates
//! - Device preferences (language, theme)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other SkyTrack crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
