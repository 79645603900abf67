//! # SkyTrack App
//!
//! Application layer - commands and the application context.
//!
//! This crate contains:
//! - Commands (user interface → backend bridge) with structured logging
//! - Application context (dependency injection, startup and shutdown)
//! - Tracing initialisation
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
