//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `SKYTRACK_STORAGE_BACKEND` is unset, falls back to a config file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With no file anywhere, uses [`Config::default`] (in-memory everything)
//!
//! ## Environment Variables
//! - `SKYTRACK_STORAGE_BACKEND`: `memory` or `sqlite` (required for env
//!   loading)
//! - `SKYTRACK_DB_PATH`: Database file path
//! - `SKYTRACK_DB_POOL_SIZE`: Connection pool size
//! - `SKYTRACK_SEARCH_LIMIT`: Maximum search results per collection
//! - `SKYTRACK_LOG_LEVEL`: Default tracing filter directive
//! - `SKYTRACK_LOG_JSON`: Emit JSON log lines (true/false)
//! - `SKYTRACK_IDENTITY_READY`: Whether the identity provider accepts calls
//! - `SKYTRACK_PREFERENCES_PATH`: JSON file for device preferences
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./skytrack.json` or `./skytrack.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use skytrack_domain::{
    Config, IdentityConfig, LoggingConfig, Result, SearchConfig, SkyTrackError, StorageBackend,
    StorageConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the backend
/// variable is missing, falls back to a config file, and finally to the
/// defaults when no file exists in any probed location.
///
/// # Errors
/// Returns `SkyTrackError::Config` if:
/// - An environment variable or file holds an invalid value
/// - A config file exists but cannot be parsed
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) if std::env::var_os(BACKEND_VAR).is_some() => Err(e),
        Err(e) => {
            tracing::debug!(error = ?e, "No environment configuration, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No config file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }
}

const BACKEND_VAR: &str = "SKYTRACK_STORAGE_BACKEND";

/// Load configuration from environment variables
///
/// `SKYTRACK_STORAGE_BACKEND` must be present; every other variable falls
/// back to the value of [`Config::default`].
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `SkyTrackError::Config` if the backend variable is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let backend = env_var(BACKEND_VAR).and_then(|s| {
        StorageBackend::from_str(&s)
            .map_err(|_| SkyTrackError::Config(format!("Invalid storage backend: {s}")))
    })?;
    let path = std::env::var("SKYTRACK_DB_PATH").unwrap_or(defaults.storage.path);
    let pool_size = env_parsed("SKYTRACK_DB_POOL_SIZE", defaults.storage.pool_size)?;

    let max_results_per_collection =
        env_parsed("SKYTRACK_SEARCH_LIMIT", defaults.search.max_results_per_collection)?;

    let level = std::env::var("SKYTRACK_LOG_LEVEL").unwrap_or(defaults.logging.level);
    let json = env_bool("SKYTRACK_LOG_JSON", defaults.logging.json);

    let ready = env_bool("SKYTRACK_IDENTITY_READY", defaults.identity.ready);
    let preferences_path = std::env::var("SKYTRACK_PREFERENCES_PATH").ok();

    Ok(Config {
        storage: StorageConfig { backend, path, pool_size },
        identity: IdentityConfig { ready },
        search: SearchConfig { max_results_per_collection },
        logging: LoggingConfig { level, json },
        preferences_path,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `SkyTrackError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SkyTrackError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SkyTrackError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SkyTrackError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SkyTrackError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SkyTrackError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SkyTrackError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, up to two parent directories and
/// the executable's directory for `config.{json,toml}` and
/// `skytrack.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 8] {
    [
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("skytrack.json"),
        dir.join("skytrack.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `SkyTrackError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SkyTrackError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable, using `default` when unset
fn env_parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| SkyTrackError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
