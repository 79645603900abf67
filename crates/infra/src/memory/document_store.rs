//! In-memory implementation of the document store port

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use skytrack_core::{Document, DocumentStore, FieldFilter, StoredDocument};
use skytrack_domain::{Collection, Result, SkyTrackError};
use uuid::Uuid;

type CollectionMap = BTreeMap<String, Document>;

/// Document store kept in process memory.
///
/// Documents of a collection are returned in key order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Collection, CollectionMap>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents stored in `collection`
    pub fn len(&self, collection: Collection) -> usize {
        self.collections.read().get(&collection).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<StoredDocument>> {
        let collections = self.collections.read();
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| StoredDocument::new(id, fields.clone())))
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &FieldFilter,
    ) -> Result<Vec<StoredDocument>> {
        let collections = self.collections.read();
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| filter.matches(fields))
                    .map(|(id, fields)| StoredDocument::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        self.collections.write().entry(collection).or_default().insert(id.to_string(), document);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, partial: Document) -> Result<()> {
        let mut collections = self.collections.write();
        let fields = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| SkyTrackError::Remote(format!("no {collection} document {id}")))?;
        fields.extend(partial);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        if let Some(docs) = self.collections.write().get_mut(&collection) {
            docs.remove(id);
        }
        Ok(())
    }

    fn new_id(&self, _collection: Collection) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
