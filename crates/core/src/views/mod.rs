//! Derived views over collection snapshots
//!
//! Pure functions backing the notes, dashboard and calendar screens.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use skytrack_domain::constants::DEFAULT_CLASS_COLOR;
use skytrack_domain::{ClassRecord, EventRecord, NoteRecord};

/// Which class a note list is restricted to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassFilter {
    #[default]
    All,
    Class(String),
}

/// Notes screen filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Matched against title and content, case-insensitively
    pub text: String,
    pub class: ClassFilter,
}

impl NoteFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), class: ClassFilter::All }
    }

    #[must_use]
    pub fn in_class(mut self, class_id: impl Into<String>) -> Self {
        self.class = ClassFilter::Class(class_id.into());
        self
    }
}

/// Notes of one class, or the unassigned bucket when `class` is `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteGroup {
    pub class: Option<ClassRecord>,
    pub notes: Vec<NoteRecord>,
}

/// Notes matching `filter`, newest first
pub fn filter_notes(notes: &[NoteRecord], filter: &NoteFilter) -> Vec<NoteRecord> {
    let needle = filter.text.trim().to_lowercase();

    let mut matched: Vec<NoteRecord> = notes
        .iter()
        .filter(|note| match &filter.class {
            ClassFilter::All => true,
            ClassFilter::Class(class_id) => note.class_id.as_deref() == Some(class_id.as_str()),
        })
        .filter(|note| {
            needle.is_empty()
                || note.title.to_lowercase().contains(&needle)
                || note.content.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matched
}

/// One group per class ordered by class name, then the unassigned group.
///
/// Notes with no class or a dangling class reference are unassigned. Classes
/// without notes still get an (empty) group; the unassigned group is always
/// last.
pub fn group_notes_by_class(notes: &[NoteRecord], classes: &[ClassRecord]) -> Vec<NoteGroup> {
    let mut ordered: Vec<&ClassRecord> = classes.iter().collect();
    ordered.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.id.cmp(&b.id)));

    let known: HashSet<&str> = classes.iter().map(|class| class.id.as_str()).collect();

    let mut groups: Vec<NoteGroup> = ordered
        .into_iter()
        .map(|class| NoteGroup {
            class: Some(class.clone()),
            notes: notes
                .iter()
                .filter(|note| note.class_id.as_deref() == Some(class.id.as_str()))
                .cloned()
                .collect(),
        })
        .collect();

    groups.push(NoteGroup {
        class: None,
        notes: notes
            .iter()
            .filter(|note| note.class_id.as_deref().map_or(true, |id| !known.contains(id)))
            .cloned()
            .collect(),
    });
    groups
}

/// Events at or after `now`, soonest first, at most `limit`
pub fn upcoming_events(events: &[EventRecord], now: DateTime<Utc>, limit: usize) -> Vec<EventRecord> {
    let mut upcoming: Vec<EventRecord> =
        events.iter().filter(|event| event.date >= now).cloned().collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    upcoming.truncate(limit);
    upcoming
}

/// Events on a UTC calendar day, in time order
pub fn events_on_day(events: &[EventRecord], day: NaiveDate) -> Vec<EventRecord> {
    let mut on_day: Vec<EventRecord> =
        events.iter().filter(|event| event.date.date_naive() == day).cloned().collect();
    on_day.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    on_day
}

/// Display color for a weak class reference
pub fn class_color<'a>(classes: &'a [ClassRecord], class_id: Option<&str>) -> &'a str {
    class_id
        .and_then(|id| classes.iter().find(|class| class.id == id))
        .map_or(DEFAULT_CLASS_COLOR, |class| class.color.as_str())
}
