//! Identity commands
//!
//! Passwords are never logged; command names are the only identifiers that
//! reach the log. Every command leaves the entity store bound to the
//! principal it produced, so records can be written as soon as it returns.

use std::future::Future;

use skytrack_domain::{Principal, ProfileUpdate, Result as DomainResult, Role};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Principal currently signed in, if any
pub fn current_principal(ctx: &AppContext) -> Option<Principal> {
    ctx.auth.current()
}

/// Whether an identity operation is in flight
pub fn is_auth_loading(ctx: &AppContext) -> bool {
    ctx.auth.is_loading()
}

pub async fn sign_in(ctx: &AppContext, email: &str, password: &str) -> DomainResult<Principal> {
    identity_command(ctx, "auth::sign_in", || ctx.auth.sign_in(email, password)).await
}

pub async fn sign_up(
    ctx: &AppContext,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> DomainResult<Principal> {
    identity_command(ctx, "auth::sign_up", || ctx.auth.sign_up(email, password, name, role))
        .await
}

pub async fn sign_in_with_provider(ctx: &AppContext) -> DomainResult<Principal> {
    identity_command(ctx, "auth::sign_in_with_provider", || ctx.auth.sign_in_with_provider())
        .await
}

/// Federated registration; `role` must be chosen before the flow starts
pub async fn sign_up_with_provider(
    ctx: &AppContext,
    role: Option<Role>,
) -> DomainResult<Principal> {
    identity_command(ctx, "auth::sign_up_with_provider", || {
        ctx.auth.sign_up_with_provider(role)
    })
    .await
}

/// Update name and/or photo; `Ok(None)` when nobody is signed in
pub async fn update_profile(
    ctx: &AppContext,
    update: ProfileUpdate,
) -> DomainResult<Option<Principal>> {
    identity_command(ctx, "auth::update_profile", || ctx.auth.update_profile(update)).await
}

pub async fn sign_out(ctx: &AppContext) -> DomainResult<()> {
    identity_command(ctx, "auth::sign_out", || ctx.auth.sign_out()).await
}

/// Run an identity operation, then bind the entity store to the resulting
/// principal whether or not the operation succeeded
async fn identity_command<T, F, Fut>(
    ctx: &AppContext,
    command_name: &'static str,
    operation: F,
) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let result = execute_command(command_name, operation).await;

    if let Err(err) = ctx.store.follow(&ctx.auth).await {
        tracing::warn!(command = command_name, error = %err, "failed to load collections");
    }

    result
}
