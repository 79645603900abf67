//! SQLite implementation of the document store port
//!
//! Documents live in one `documents(collection, id, body)` table with the
//! field map serialised as JSON text. All SQLite work runs on the blocking
//! pool.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use skytrack_core::{Document, DocumentStore, FieldFilter, StoredDocument};
use skytrack_domain::{Collection, Result, SkyTrackError};
use tokio::task;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::conversions::map_err;

/// SQLite-backed implementation of `DocumentStore`
pub struct SqliteDocumentStore {
    db: Arc<DbManager>,
}

impl SqliteDocumentStore {
    /// Create a new store; the schema must already be migrated
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    #[instrument(skip(self))]
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<StoredDocument>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<Option<StoredDocument>> {
            let conn = db.get_connection()?;
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection.as_str(), &id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_err)?;

            body.map(|body| parse_body(&body).map(|fields| StoredDocument::new(id, fields)))
                .transpose()
        })
        .await
        .map_err(map_err)?
    }

    #[instrument(skip(self))]
    async fn query(
        &self,
        collection: Collection,
        filter: &FieldFilter,
    ) -> Result<Vec<StoredDocument>> {
        let db = Arc::clone(&self.db);
        let filter = filter.clone();

        task::spawn_blocking(move || -> Result<Vec<StoredDocument>> {
            let conn = db.get_connection()?;
            let rows = match &filter {
                // String equality is pushed down to SQLite; everything is
                // re-checked below.
                FieldFilter::Eq { field, value: Value::String(expected) } => {
                    let mut stmt = conn
                        .prepare(
                            "SELECT id, body FROM documents
                             WHERE collection = ?1 AND json_extract(body, ?2) = ?3
                             ORDER BY id",
                        )
                        .map_err(map_err)?;
                    let path = format!("$.\"{field}\"");
                    let rows = stmt
                        .query_map(params![collection.as_str(), path, expected], read_row)
                        .map_err(map_err)?
                        .collect::<rusqlite::Result<Vec<_>>>()
                        .map_err(map_err)?;
                    rows
                }
                _ => {
                    let mut stmt = conn
                        .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id")
                        .map_err(map_err)?;
                    let rows = stmt
                        .query_map(params![collection.as_str()], read_row)
                        .map_err(map_err)?
                        .collect::<rusqlite::Result<Vec<_>>>()
                        .map_err(map_err)?;
                    rows
                }
            };

            let mut documents = Vec::with_capacity(rows.len());
            for (id, body) in rows {
                let fields = parse_body(&body)?;
                if filter.matches(&fields) {
                    documents.push(StoredDocument::new(id, fields));
                }
            }
            debug!(count = documents.len(), "documents queried");
            Ok(documents)
        })
        .await
        .map_err(map_err)?
    }

    #[instrument(skip(self, document))]
    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let body = serde_json::to_string(&document).map_err(map_err)?;
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO documents (collection, id, body, updated_at)
                 VALUES (?1, ?2, ?3, CAST(strftime('%s','now') AS INTEGER))
                 ON CONFLICT(collection, id) DO UPDATE SET
                    body = excluded.body,
                    updated_at = excluded.updated_at",
                params![collection.as_str(), &id, body],
            )
            .map_err(map_err)?;
            Ok(())
        })
        .await
        .map_err(map_err)?
    }

    #[instrument(skip(self, partial))]
    async fn update(&self, collection: Collection, id: &str, partial: Document) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_err)?;

            let body: Option<String> = tx
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection.as_str(), &id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_err)?;
            let Some(body) = body else {
                return Err(SkyTrackError::Remote(format!("no {collection} document {id}")));
            };

            let mut fields = parse_body(&body)?;
            fields.extend(partial);
            let merged = serde_json::to_string(&fields).map_err(map_err)?;

            tx.execute(
                "UPDATE documents SET body = ?3, updated_at = CAST(strftime('%s','now') AS INTEGER)
                 WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), &id, merged],
            )
            .map_err(map_err)?;
            tx.commit().map_err(map_err)?;
            Ok(())
        })
        .await
        .map_err(map_err)?
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), &id],
            )
            .map_err(map_err)?;
            Ok(())
        })
        .await
        .map_err(map_err)?
    }

    fn new_id(&self, _collection: Collection) -> String {
        Uuid::now_v7().to_string()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn parse_body(body: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(body).map_err(map_err)? {
        Value::Object(fields) => Ok(fields),
        other => Err(SkyTrackError::Remote(format!("stored document is not an object: {other}"))),
    }
}

// =============================================================================
// Tests
// =============================================================================
