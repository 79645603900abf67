//! Search result set

use serde::Serialize;

use super::records::{ClassRecord, ContactRecord, NoteRecord, TaskRecord};

/// Matches per searchable collection, each list already truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub classes: Vec<ClassRecord>,
    pub tasks: Vec<TaskRecord>,
    pub notes: Vec<NoteRecord>,
    pub contacts: Vec<ContactRecord>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.classes.len() + self.tasks.len() + self.notes.len() + self.contacts.len()
    }

    /// Searched, found nothing.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
