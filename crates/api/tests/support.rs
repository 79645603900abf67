#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use skytrack_core::{Document, DocumentStore, ExternalIdentity, FieldFilter, StoredDocument};
use skytrack_domain::{Collection, Config, Result, SkyTrackError, StorageBackend, StorageConfig};
use skytrack_infra::{InMemoryDocumentStore, InMemoryIdentityProvider, InMemoryPreferenceStore};
use skytrack_lib::{Adapters, AppContext};
use tempfile::TempDir;

/// Config using the SQLite backend inside `dir`
pub fn sqlite_config(dir: &TempDir) -> Config {
    Config {
        storage: StorageConfig {
            backend: StorageBackend::Sqlite,
            path: dir.path().join("skytrack.db").to_string_lossy().to_string(),
            pool_size: 4,
        },
        preferences_path: Some(dir.path().join("prefs.json").to_string_lossy().to_string()),
        ..Config::default()
    }
}

/// Create a SQLite-backed context in a fresh temp dir.
///
/// Returns the temp dir too so the database outlives the context.
pub async fn sqlite_context() -> (AppContext, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temporary test directory");
    let ctx = AppContext::new_with_config(sqlite_config(&temp_dir))
        .await
        .expect("AppContext creation should succeed");
    (ctx, temp_dir)
}

/// Handles to the in-memory adapters behind a test context
pub struct Harness {
    pub ctx: AppContext,
    pub identity: Arc<InMemoryIdentityProvider>,
    pub documents: Arc<FlakyDocumentStore>,
}

/// In-memory context whose identity provider offers `federated` for the
/// third-party flow.
pub async fn memory_harness(federated: Option<ExternalIdentity>) -> Harness {
    let identity = Arc::new(InMemoryIdentityProvider::new());
    identity.set_federated_identity(federated);
    let documents = Arc::new(FlakyDocumentStore::default());

    let adapters = Adapters {
        documents: documents.clone(),
        identity: identity.clone(),
        preferences: Arc::new(InMemoryPreferenceStore::new()),
        db: None,
    };
    let ctx = AppContext::new_with_adapters(Config::default(), adapters)
        .await
        .expect("AppContext creation should succeed");

    Harness { ctx, identity, documents }
}

pub fn federated_identity(uid: &str, email: &str) -> ExternalIdentity {
    ExternalIdentity {
        uid: uid.to_string(),
        email: email.to_string(),
        display_name: None,
        photo_url: None,
    }
}

/// In-memory document store whose writes can be made to fail
#[derive(Default)]
pub struct FlakyDocumentStore {
    inner: InMemoryDocumentStore,
    failing_writes: AtomicBool,
}

impl FlakyDocumentStore {
    /// Documents currently stored in `collection`
    pub fn len(&self, collection: Collection) -> usize {
        self.inner.len(collection)
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(SkyTrackError::Remote("document store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<StoredDocument>> {
        self.inner.get(collection, id).await
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &FieldFilter,
    ) -> Result<Vec<StoredDocument>> {
        self.inner.query(collection, filter).await
    }

    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        self.check()?;
        self.inner.set(collection, id, document).await
    }

    async fn update(&self, collection: Collection, id: &str, partial: Document) -> Result<()> {
        self.check()?;
        self.inner.update(collection, id, partial).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.check()?;
        self.inner.delete(collection, id).await
    }

    fn new_id(&self, collection: Collection) -> String {
        self.inner.new_id(collection)
    }
}
