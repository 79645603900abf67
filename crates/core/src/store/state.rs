//! In-memory mirror of the principal's collections

use std::collections::HashSet;

use serde::Serialize;
use skytrack_domain::{
    ClassRecord, Collection, ContactRecord, EventRecord, NoteRecord, Principal, TaskRecord,
};

use super::entity::Entity;

/// Snapshot of every collection, in load/append order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collections {
    pub classes: Vec<ClassRecord>,
    pub tasks: Vec<TaskRecord>,
    pub notes: Vec<NoteRecord>,
    pub contacts: Vec<ContactRecord>,
    pub events: Vec<EventRecord>,
}

impl Collections {
    pub fn len(&self) -> usize {
        self.classes.len()
            + self.tasks.len()
            + self.notes.len()
            + self.contacts.len()
            + self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class a weak reference points to, if it still exists
    pub fn class(&self, class_id: Option<&str>) -> Option<&ClassRecord> {
        let class_id = class_id?;
        self.classes.iter().find(|class| class.id == class_id)
    }

    /// Overlay the changes confirmed while a load was running.
    ///
    /// `self` is the freshly loaded data and `memory` what the store held when
    /// the load finished. Records touched during the load take their in-memory
    /// version; records removed during the load are dropped.
    pub(crate) fn settle(&mut self, memory: &Self, journal: &LoadJournal) {
        settle_kind::<ClassRecord>(self, memory, journal);
        settle_kind::<TaskRecord>(self, memory, journal);
        settle_kind::<NoteRecord>(self, memory, journal);
        settle_kind::<ContactRecord>(self, memory, journal);
        settle_kind::<EventRecord>(self, memory, journal);
    }
}

fn settle_kind<E: Entity>(loaded: &mut Collections, memory: &Collections, journal: &LoadJournal) {
    let target = E::slot_mut(loaded);
    target.retain(|record| !journal.was_removed(E::COLLECTION, record.id()));

    for record in E::slot(memory).iter().filter(|r| journal.was_touched(E::COLLECTION, r.id())) {
        match target.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(existing) => existing.clone_from(record),
            None => target.push(record.clone()),
        }
    }
}

/// Writes confirmed while at least one load of the current generation runs
#[derive(Debug, Default)]
pub(crate) struct LoadJournal {
    in_flight: usize,
    touched: HashSet<(Collection, String)>,
    removed: HashSet<(Collection, String)>,
}

impl LoadJournal {
    pub fn begin(&mut self) {
        self.in_flight += 1;
    }

    /// One load finished; the journal empties with the last one
    pub fn end(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.touched.clear();
            self.removed.clear();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn touch(&mut self, collection: Collection, id: &str) {
        if self.is_loading() {
            self.touched.insert((collection, id.to_string()));
        }
    }

    pub fn remove(&mut self, collection: Collection, id: &str) {
        if self.is_loading() {
            self.removed.insert((collection, id.to_string()));
        }
    }

    fn was_touched(&self, collection: Collection, id: &str) -> bool {
        self.touched.contains(&(collection, id.to_string()))
    }

    fn was_removed(&self, collection: Collection, id: &str) -> bool {
        self.removed.contains(&(collection, id.to_string()))
    }
}

/// Store state guarded by the entity store's lock.
///
/// `generation` increases on every principal change. Work started under an
/// older generation must not touch `collections`. `loaded` turns true once a
/// load of the current generation has succeeded.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub principal: Option<Principal>,
    pub generation: u64,
    pub collections: Collections,
    pub loaded: bool,
    pub(crate) journal: LoadJournal,
}
