//! Create, update, delete and list commands for the entity collections
//!
//! One generic implementation serves classes, tasks, notes, contacts and
//! events; the record type picks the collection.

use skytrack_core::Entity;
use skytrack_domain::{ClassRecord, Result as DomainResult, SkyTrackError};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Create a record owned by the signed-in principal
pub async fn add_record<E: Entity>(ctx: &AppContext, draft: E::Draft) -> DomainResult<E> {
    let command = format!("entities::add_{}", E::KIND);
    execute_command(&command, || ctx.store.add::<E>(draft)).await
}

/// Apply a partial update and return the merged record
pub async fn update_record<E: Entity>(
    ctx: &AppContext,
    id: &str,
    patch: E::Patch,
) -> DomainResult<E> {
    let command = format!("entities::update_{}", E::KIND);
    execute_command(&command, || async {
        ctx.store.update::<E>(id, patch).await?;
        ctx.store.get::<E>(id).await.ok_or_else(|| SkyTrackError::not_found(E::KIND, id))
    })
    .await
}

/// Delete a record; references to it from other records are left as they are
pub async fn delete_record<E: Entity>(ctx: &AppContext, id: &str) -> DomainResult<()> {
    let command = format!("entities::delete_{}", E::KIND);
    execute_command(&command, || ctx.store.remove::<E>(id)).await
}

pub async fn get_record<E: Entity>(ctx: &AppContext, id: &str) -> DomainResult<E> {
    ctx.store.get::<E>(id).await.ok_or_else(|| SkyTrackError::not_found(E::KIND, id))
}

/// Every record of the kind, in collection order
pub async fn list_records<E: Entity>(ctx: &AppContext) -> Vec<E> {
    ctx.store.all::<E>().await
}

/// The class a `classID` points to; `None` for unset or dangling references
pub async fn resolve_class(ctx: &AppContext, class_id: Option<&str>) -> Option<ClassRecord> {
    ctx.store.resolve_class(class_id).await
}

/// Re-read every collection of the signed-in principal
pub async fn reload_records(ctx: &AppContext) -> DomainResult<()> {
    execute_command("entities::reload", || ctx.store.reload()).await
}
