//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SEARCH_RESULT_LIMIT;
use crate::impl_domain_enum_conversions;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Where device preferences are kept; `None` keeps them in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences_path: Option<String>,
}

/// Which document store backs the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

impl_domain_enum_conversions!(StorageBackend {
    Memory => "memory",
    Sqlite => "sqlite",
});

/// Document store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file, only read by the SQLite backend.
    pub path: String,
    pub pool_size: u32,
}

/// Identity provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// When false every identity operation fails with `NotReady`.
    pub ready: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { ready: true }
    }
}

/// Search aggregator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_results_per_collection: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results_per_collection: DEFAULT_SEARCH_RESULT_LIMIT }
    }
}

/// Tracing subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                path: "skytrack.db".to_string(),
                pool_size: 4,
            },
            identity: IdentityConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
            preferences_path: None,
        }
    }
}
