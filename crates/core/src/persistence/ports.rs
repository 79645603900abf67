//! Port interfaces for the remote document store
//!
//! The document store is a key-path interface (collection + id) over JSON
//! objects. Implementations may deliver writes at least once and make them
//! visible eventually; the core never assumes more than that.

use async_trait::async_trait;
use serde_json::{Map, Value};
use skytrack_domain::{Collection, Result};

/// Field map of a persisted document.
pub type Document = Map<String, Value>;

/// A document together with the key it is stored under
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, fields: Document) -> Self {
        Self { id: id.into(), fields }
    }
}

/// Predicate evaluated by [`DocumentStore::query`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    /// Every document in the collection.
    All,
    /// Documents whose `field` equals `value`.
    Eq { field: String, value: Value },
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq { field: field.into(), value: value.into() }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => document.get(field) == Some(value),
        }
    }
}

/// Trait for the remote document persistence capability
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` when absent
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<StoredDocument>>;

    /// Fetch every document of a collection matching the filter
    async fn query(&self, collection: Collection, filter: &FieldFilter)
        -> Result<Vec<StoredDocument>>;

    /// Create or replace a document
    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<()>;

    /// Merge fields into an existing document; fails when it does not exist
    async fn update(&self, collection: Collection, id: &str, partial: Document) -> Result<()>;

    /// Delete a document; deleting an absent document succeeds
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Allocate a fresh document id
    fn new_id(&self, collection: Collection) -> String;
}
