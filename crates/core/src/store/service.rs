//! Entity store - owns the in-memory collections of the current principal
//!
//! Every mutation is confirmed by the document store before memory changes
//! (optimistic-after-confirm). The state lock is never held across an adapter
//! call. Concurrent writes to one record are not coordinated: the last
//! confirmation wins.

use std::sync::Arc;

use chrono::Utc;
use skytrack_domain::constants::{DEFAULT_SEARCH_RESULT_LIMIT, OWNER_FIELD};
use skytrack_domain::{
    AuthError, ClassPatch, ClassRecord, ContactPatch, ContactRecord, EventPatch, EventRecord,
    NewClass, NewContact, NewEvent, NewNote, NewTask, NotePatch, NoteRecord, Principal, Result,
    SearchResults, SkyTrackError, TaskPatch, TaskRecord,
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::entity::Entity;
use super::state::{Collections, LoadJournal, StoreState};
use crate::identity::AuthService;
use crate::persistence::{codec, DocumentStore, FieldFilter};
use crate::search;

/// In-memory collections of the signed-in principal, backed by a document store
pub struct EntityStore {
    documents: Arc<dyn DocumentStore>,
    state: RwLock<StoreState>,
    search_limit: usize,
}

impl EntityStore {
    /// Empty store with no principal bound
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            documents,
            state: RwLock::new(StoreState::default()),
            search_limit: DEFAULT_SEARCH_RESULT_LIMIT,
        }
    }

    /// Cap the number of matches returned per collection by [`Self::search`]
    #[must_use]
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Principal the collections currently belong to
    pub async fn principal(&self) -> Option<Principal> {
        self.state.read().await.principal.clone()
    }

    // ========================================================================
    // Principal binding
    // ========================================================================

    /// React to a principal change.
    ///
    /// A new principal clears memory and loads its records; `None` clears.
    /// The same principal again (for instance after a profile edit) only
    /// refreshes the stored principal, unless its last load failed, in which
    /// case the load is retried. A load that completes after yet another
    /// change is discarded.
    #[instrument(skip_all, fields(uid = principal.as_ref().map(|p| p.uid.as_str())))]
    pub async fn on_principal_changed(&self, principal: Option<Principal>) -> Result<()> {
        self.apply_principal(move || principal).await
    }

    /// Bring the store in line with the principal `auth` holds right now.
    ///
    /// The principal is read under the store lock, so callers racing each
    /// other always settle on the latest one.
    #[instrument(skip_all)]
    pub async fn follow(&self, auth: &AuthService) -> Result<()> {
        self.apply_principal(|| auth.current()).await
    }

    async fn apply_principal(&self, next: impl FnOnce() -> Option<Principal>) -> Result<()> {
        let (uid, generation) = {
            let mut state = self.state.write().await;
            let principal = next();
            let switched = match (&state.principal, &principal) {
                (Some(current), Some(incoming)) => current.uid != incoming.uid,
                (None, None) => false,
                _ => true,
            };
            state.principal = principal;

            if switched {
                state.generation += 1;
                state.collections = Collections::default();
                state.loaded = false;
                state.journal = LoadJournal::default();
            } else if state.principal.is_none() || state.loaded || state.journal.is_loading() {
                return Ok(());
            }

            let Some(principal) = &state.principal else {
                info!("collections cleared");
                return Ok(());
            };
            let uid = principal.uid.clone();
            if !switched {
                debug!(uid = %uid, "retrying collection load");
            }
            state.journal.begin();
            (uid, state.generation)
        };

        self.load_into(generation, &uid).await
    }

    /// Fetch every collection of the current principal again
    ///
    /// Writes confirmed while the fetch runs are kept.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<()> {
        let (uid, generation) = {
            let mut state = self.state.write().await;
            let Some(principal) = &state.principal else {
                debug!("reload skipped while signed out");
                return Ok(());
            };
            let uid = principal.uid.clone();
            state.journal.begin();
            (uid, state.generation)
        };

        self.load_into(generation, &uid).await
    }

    /// Load `uid`'s records and install them unless the principal changed
    async fn load_into(&self, generation: u64, uid: &str) -> Result<()> {
        let loaded = self.load(uid).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(generation, current = state.generation, "discarding stale load");
            return loaded.map(|_| ());
        }

        let result = match loaded {
            Ok(mut collections) => {
                collections.settle(&state.collections, &state.journal);
                info!(records = collections.len(), "collections loaded");
                state.collections = collections;
                state.loaded = true;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "collection load failed");
                Err(err)
            }
        };
        state.journal.end();
        result
    }

    async fn load(&self, uid: &str) -> Result<Collections> {
        let filter = FieldFilter::eq(OWNER_FIELD, uid);
        Ok(Collections {
            classes: self.load_kind(uid, &filter).await?,
            tasks: self.load_kind(uid, &filter).await?,
            notes: self.load_kind(uid, &filter).await?,
            contacts: self.load_kind(uid, &filter).await?,
            events: self.load_kind(uid, &filter).await?,
        })
    }

    async fn load_kind<E: Entity>(&self, uid: &str, filter: &FieldFilter) -> Result<Vec<E>> {
        let documents = self.documents.query(E::COLLECTION, filter).await?;
        let mut records = Vec::with_capacity(documents.len());

        for document in documents {
            let id = document.id.clone();
            match codec::decode::<E>(E::COLLECTION, document) {
                Ok(record) if record.owner() == uid => records.push(record),
                Ok(record) => warn!(
                    collection = %E::COLLECTION,
                    id = %id,
                    owner = record.owner(),
                    "skipping document owned by another principal"
                ),
                Err(err) => warn!(
                    collection = %E::COLLECTION,
                    id = %id,
                    error = %err,
                    "skipping undecodable document"
                ),
            }
        }

        debug!(collection = %E::COLLECTION, count = records.len(), "collection fetched");
        Ok(records)
    }

    // ========================================================================
    // Generic mutations
    // ========================================================================

    /// Create a record owned by the current principal
    pub async fn add<E: Entity>(&self, draft: E::Draft) -> Result<E> {
        let draft = E::prepare_draft(draft)?;

        let (owner, generation) = {
            let state = self.state.read().await;
            let principal = state.principal.as_ref().ok_or(AuthError::Unauthenticated)?;
            (principal.uid.clone(), state.generation)
        };

        let id = self.documents.new_id(E::COLLECTION);
        let record = E::from_draft(id, owner, draft, Utc::now());
        self.documents.set(E::COLLECTION, record.id(), codec::encode(&record)?).await?;

        let mut state = self.state.write().await;
        if state.generation == generation {
            E::slot_mut(&mut state.collections).push(record.clone());
            state.journal.touch(E::COLLECTION, record.id());
            info!(collection = %E::COLLECTION, id = record.id(), "record added");
        } else {
            debug!(collection = %E::COLLECTION, id = record.id(), "principal changed before confirmation");
        }

        Ok(record)
    }

    /// Apply a partial update to a record in memory
    pub async fn update<E: Entity>(&self, id: &str, patch: E::Patch) -> Result<()> {
        let patch = E::prepare_patch(patch)?;
        let generation = self.require_present::<E>(id).await?;

        self.documents.update(E::COLLECTION, id, codec::encode_patch(&patch)?).await?;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(collection = %E::COLLECTION, id, "principal changed before confirmation");
            return Ok(());
        }
        let Some(record) =
            E::slot_mut(&mut state.collections).iter_mut().find(|record| record.id() == id)
        else {
            debug!(collection = %E::COLLECTION, id, "record removed before confirmation");
            return Ok(());
        };
        record.apply_patch(&patch);
        state.journal.touch(E::COLLECTION, id);
        info!(collection = %E::COLLECTION, id, "record updated");
        Ok(())
    }

    /// Delete a record; memory only changes once the delete is confirmed
    pub async fn remove<E: Entity>(&self, id: &str) -> Result<()> {
        let generation = self.require_present::<E>(id).await?;

        self.documents.delete(E::COLLECTION, id).await?;

        let mut state = self.state.write().await;
        if state.generation == generation {
            E::slot_mut(&mut state.collections).retain(|record| record.id() != id);
            state.journal.remove(E::COLLECTION, id);
            info!(collection = %E::COLLECTION, id, "record removed");
        } else {
            debug!(collection = %E::COLLECTION, id, "principal changed before confirmation");
        }
        Ok(())
    }

    async fn require_present<E: Entity>(&self, id: &str) -> Result<u64> {
        let state = self.state.read().await;
        if E::slot(&state.collections).iter().any(|record| record.id() == id) {
            Ok(state.generation)
        } else {
            Err(SkyTrackError::not_found(E::KIND, id))
        }
    }

    // ========================================================================
    // Readers
    // ========================================================================

    /// Look one record up by id
    pub async fn get<E: Entity>(&self, id: &str) -> Option<E> {
        let state = self.state.read().await;
        E::slot(&state.collections).iter().find(|record| record.id() == id).cloned()
    }

    /// Every record of one kind
    pub async fn all<E: Entity>(&self) -> Vec<E> {
        E::slot(&self.state.read().await.collections).clone()
    }

    /// Copy of every collection
    pub async fn snapshot(&self) -> Collections {
        self.state.read().await.collections.clone()
    }

    /// Class a weak reference points to; `None` when absent or dangling
    pub async fn resolve_class(&self, class_id: Option<&str>) -> Option<ClassRecord> {
        self.state.read().await.collections.class(class_id).cloned()
    }

    /// Case-insensitive substring search over classes, tasks, notes and contacts
    ///
    /// `None` means "not searching" (blank query).
    pub async fn search(&self, query: &str) -> Option<SearchResults> {
        let state = self.state.read().await;
        search::search(&state.collections, query, self.search_limit)
    }

    /// Snapshot of the classes
    pub async fn classes(&self) -> Vec<ClassRecord> {
        self.all().await
    }

    /// Snapshot of the tasks
    pub async fn tasks(&self) -> Vec<TaskRecord> {
        self.all().await
    }

    /// Snapshot of the notes
    pub async fn notes(&self) -> Vec<NoteRecord> {
        self.all().await
    }

    /// Snapshot of the contacts
    pub async fn contacts(&self) -> Vec<ContactRecord> {
        self.all().await
    }

    /// Snapshot of the events
    pub async fn events(&self) -> Vec<EventRecord> {
        self.all().await
    }

    // ========================================================================
    // Per-kind operations
    // ========================================================================

    /// Create a class
    pub async fn add_class(&self, draft: NewClass) -> Result<ClassRecord> {
        self.add(draft).await
    }

    /// Patch a class
    pub async fn update_class(&self, id: &str, patch: ClassPatch) -> Result<()> {
        self.update::<ClassRecord>(id, patch).await
    }

    /// Delete a class; tasks, notes, contacts and events keep their `classID`
    pub async fn remove_class(&self, id: &str) -> Result<()> {
        self.remove::<ClassRecord>(id).await
    }

    /// Create a task
    pub async fn add_task(&self, draft: NewTask) -> Result<TaskRecord> {
        self.add(draft).await
    }

    /// Patch a task
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<()> {
        self.update::<TaskRecord>(id, patch).await
    }

    /// Delete a task
    pub async fn remove_task(&self, id: &str) -> Result<()> {
        self.remove::<TaskRecord>(id).await
    }

    /// Create a note
    pub async fn add_note(&self, draft: NewNote) -> Result<NoteRecord> {
        self.add(draft).await
    }

    /// Patch a note
    pub async fn update_note(&self, id: &str, patch: NotePatch) -> Result<()> {
        self.update::<NoteRecord>(id, patch).await
    }

    /// Delete a note
    pub async fn remove_note(&self, id: &str) -> Result<()> {
        self.remove::<NoteRecord>(id).await
    }

    /// Create a contact
    pub async fn add_contact(&self, draft: NewContact) -> Result<ContactRecord> {
        self.add(draft).await
    }

    /// Patch a contact
    pub async fn update_contact(&self, id: &str, patch: ContactPatch) -> Result<()> {
        self.update::<ContactRecord>(id, patch).await
    }

    /// Delete a contact
    pub async fn remove_contact(&self, id: &str) -> Result<()> {
        self.remove::<ContactRecord>(id).await
    }

    /// Create a event
    pub async fn add_event(&self, draft: NewEvent) -> Result<EventRecord> {
        self.add(draft).await
    }

    /// Patch a event
    pub async fn update_event(&self, id: &str, patch: EventPatch) -> Result<()> {
        self.update::<EventRecord>(id, patch).await
    }

    /// Delete a event
    pub async fn remove_event(&self, id: &str) -> Result<()> {
        self.remove::<EventRecord>(id).await
    }
}
