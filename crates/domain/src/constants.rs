//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Search
pub const DEFAULT_SEARCH_RESULT_LIMIT: usize = 5;

// Calendar
pub const DEFAULT_UPCOMING_EVENT_LIMIT: usize = 5;
pub const DEFAULT_CLASS_COLOR: &str = "#6366f1";

// Identity
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Persisted documents
pub const RECORD_SCHEMA_VERSION: u64 = 1;
pub const SCHEMA_VERSION_FIELD: &str = "schemaVersion";
pub const OWNER_FIELD: &str = "owner";
