//! Tracing setup and structured command logging

use std::time::Duration;

use skytrack_domain::{LoggingConfig, SkyTrackError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.level`. Calling this more than once is
/// harmless: later calls leave the first subscriber in place and return
/// `false`.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed =
        if config.json { builder.json().try_init().is_ok() } else { builder.try_init().is_ok() };

    if installed {
        info!(level = %config.level, json = config.json, "tracing initialised");
    }
    installed
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"entities::add_task"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - Failure label from [`error_label`], `None` on success.
///
/// Callers must avoid forwarding sensitive values (passwords, note content)
/// in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&'static str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => {
            warn!(command, duration_ms, error_type, "command_execution_failure");
        }
    }
}

/// Convert a `SkyTrackError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SkyTrackError) -> &'static str {
    match error {
        SkyTrackError::Validation(_) => "validation",
        SkyTrackError::Auth(_) => "auth",
        SkyTrackError::NotFound(_) => "not_found",
        SkyTrackError::Remote(_) => "remote",
        SkyTrackError::Config(_) => "config",
        SkyTrackError::Internal(_) => "internal",
    }
}
