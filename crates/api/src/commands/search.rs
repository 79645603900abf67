//! Search and derived list views

use chrono::{DateTime, NaiveDate, Utc};
use skytrack_core::views::{self, NoteFilter, NoteGroup};
use skytrack_domain::{EventRecord, NoteRecord, SearchResults};

use crate::context::AppContext;

/// Case-insensitive substring search over classes, tasks, notes and contacts
///
/// `None` means "not searching" (blank query).
pub async fn search(ctx: &AppContext, query: &str) -> Option<SearchResults> {
    let results = ctx.store.search(query).await;
    if let Some(results) = &results {
        tracing::debug!(total = results.total(), "search completed");
    }
    results
}

pub async fn filter_notes(ctx: &AppContext, filter: &NoteFilter) -> Vec<NoteRecord> {
    views::filter_notes(&ctx.store.notes().await, filter)
}

/// Notes grouped under their class, unassigned notes last
pub async fn notes_by_class(ctx: &AppContext) -> Vec<NoteGroup> {
    let snapshot = ctx.store.snapshot().await;
    views::group_notes_by_class(&snapshot.notes, &snapshot.classes)
}

pub async fn upcoming_events(
    ctx: &AppContext,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<EventRecord> {
    views::upcoming_events(&ctx.store.events().await, now, limit)
}

pub async fn events_on_day(ctx: &AppContext, day: NaiveDate) -> Vec<EventRecord> {
    views::events_on_day(&ctx.store.events().await, day)
}

/// Display color of the class `class_id` refers to, or the default color
pub async fn class_color(ctx: &AppContext, class_id: Option<&str>) -> String {
    views::class_color(&ctx.store.classes().await, class_id).to_string()
}
