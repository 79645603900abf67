//! Free-text search across the searchable collections
//!
//! Each collection is filtered independently on its primary label by
//! case-insensitive substring match. Matches are ordered by lowercase label,
//! then id, before truncation so the cut is deterministic.

use skytrack_domain::SearchResults;

use crate::store::{Collections, Entity};

/// Search classes, tasks, notes and contacts.
///
/// A blank query returns `None` ("not searching"), which differs from
/// `Some` with no matches.
pub fn search(collections: &Collections, query: &str, limit: usize) -> Option<SearchResults> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    Some(SearchResults {
        classes: matching(&collections.classes, &needle, limit),
        tasks: matching(&collections.tasks, &needle, limit),
        notes: matching(&collections.notes, &needle, limit),
        contacts: matching(&collections.contacts, &needle, limit),
    })
}

fn matching<E: Entity>(records: &[E], needle: &str, limit: usize) -> Vec<E> {
    let mut hits: Vec<(String, &E)> = records
        .iter()
        .filter_map(|record| {
            let label = record.label().to_lowercase();
            label.contains(needle).then_some((label, record))
        })
        .collect();

    hits.sort_by(|(a_label, a), (b_label, b)| a_label.cmp(b_label).then_with(|| a.id().cmp(b.id())));
    hits.into_iter().take(limit).map(|(_, record)| record.clone()).collect()
}
