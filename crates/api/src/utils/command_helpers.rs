//! Command execution helpers
//!
//! Every command runs through [`execute_command`] so timing and outcome are
//! logged the same way.

use std::future::Future;
use std::time::Instant;

use skytrack_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with automatic timing and logging
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext, id: &str) -> DomainResult<TaskRecord> {
///     execute_command("my_module::my_command", || async {
///         ctx.store.get(id).await.ok_or_else(|| SkyTrackError::not_found("task", id))
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), error_type);

    result
}
