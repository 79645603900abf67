//! Mock document store

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use skytrack_core::{Document, DocumentStore, FieldFilter, StoredDocument};
use skytrack_domain::{Collection, Result, SkyTrackError};
use tokio::sync::Notify;

/// Document store operation, for failure injection and call counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Query,
    Set,
    Update,
    Delete,
}

/// In-memory document store that records calls and fails on demand.
///
/// Documents are kept per collection in key order so query results are
/// stable.
#[derive(Default)]
pub struct MockDocumentStore {
    documents: Mutex<HashMap<Collection, BTreeMap<String, Document>>>,
    failing: Mutex<HashSet<Op>>,
    calls: Mutex<HashMap<Op, usize>>,
    next_id: AtomicUsize,
    held_owner: Mutex<Option<(String, Arc<Notify>)>>,
}

impl MockDocumentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a raw document, bypassing call counting
    pub fn seed(&self, collection: Collection, id: &str, fields: Value) {
        let Value::Object(fields) = fields else {
            panic!("seed documents must be JSON objects");
        };
        self.documents.lock().entry(collection).or_default().insert(id.to_string(), fields);
    }

    /// Seed a class owned by `owner`
    pub fn seed_class(&self, id: &str, name: &str, owner: &str) {
        self.seed(
            Collection::Classes,
            id,
            json!({ "name": name, "color": "#fff", "owner": owner, "schemaVersion": 1 }),
        );
    }

    /// Seed a task owned by `owner`
    pub fn seed_task(&self, id: &str, title: &str, owner: &str) {
        self.seed(
            Collection::Tasks,
            id,
            json!({ "title": title, "status": "todo", "owner": owner, "schemaVersion": 1 }),
        );
    }

    pub fn document(&self, collection: Collection, id: &str) -> Option<Document> {
        self.documents.lock().get(&collection).and_then(|docs| docs.get(id).cloned())
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.documents.lock().get(&collection).map_or(0, BTreeMap::len)
    }

    /// Make every subsequent `op` fail with a remote error
    pub fn fail(&self, op: Op) {
        self.failing.lock().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.lock().remove(&op);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Hold owner-filtered queries for `owner` until the returned handle is
    /// notified. A held query has already read its results.
    pub fn hold_queries_for(&self, owner: &str) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.held_owner.lock() = Some((owner.to_string(), release.clone()));
        release
    }

    fn enter(&self, op: Op) -> Result<()> {
        *self.calls.lock().entry(op).or_default() += 1;
        if self.failing.lock().contains(&op) {
            return Err(SkyTrackError::Remote(format!("injected {op:?} failure")));
        }
        Ok(())
    }

    fn held_release(&self, filter: &FieldFilter) -> Option<Arc<Notify>> {
        let FieldFilter::Eq { value, .. } = filter else {
            return None;
        };
        let held = self.held_owner.lock();
        let (owner, release) = held.as_ref()?;
        (value.as_str() == Some(owner.as_str())).then(|| release.clone())
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<StoredDocument>> {
        self.enter(Op::Get)?;
        Ok(self.document(collection, id).map(|fields| StoredDocument::new(id, fields)))
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &FieldFilter,
    ) -> Result<Vec<StoredDocument>> {
        self.enter(Op::Query)?;
        let results = self
            .documents
            .lock()
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| filter.matches(fields))
                    .map(|(id, fields)| StoredDocument::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(release) = self.held_release(filter) {
            release.notified().await;
            // Let the other queries of the same load through as well.
            release.notify_one();
        }

        Ok(results)
    }

    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        self.enter(Op::Set)?;
        self.documents.lock().entry(collection).or_default().insert(id.to_string(), document);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, partial: Document) -> Result<()> {
        self.enter(Op::Update)?;
        let mut documents = self.documents.lock();
        let existing = documents
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| SkyTrackError::Remote(format!("no {collection} document {id}")))?;
        existing.extend(partial);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.enter(Op::Delete)?;
        if let Some(docs) = self.documents.lock().get_mut(&collection) {
            docs.remove(id);
        }
        Ok(())
    }

    fn new_id(&self, collection: Collection) -> String {
        format!("{collection}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
