//! Per-kind plumbing shared by the generic store operations

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use skytrack_domain::{
    ClassPatch, ClassRecord, Collection, ContactPatch, ContactRecord, EventPatch, EventRecord,
    NewClass, NewContact, NewEvent, NewNote, NewTask, NotePatch, NoteRecord, Result, TaskPatch,
    TaskRecord,
};

use super::state::Collections;

/// A record kind owned by a principal and mirrored by the entity store
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Caller-provided fields of a create
    type Draft: Debug + Send;
    /// Optional fields of a partial update
    type Patch: Debug + Serialize + Send + Sync;

    const COLLECTION: Collection;
    /// Human readable kind used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn owner(&self) -> &str;
    /// Primary name/title field
    fn label(&self) -> &str;

    fn prepare_draft(draft: Self::Draft) -> Result<Self::Draft>;
    fn prepare_patch(patch: Self::Patch) -> Result<Self::Patch>;
    fn from_draft(id: String, owner: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;
    fn apply_patch(&mut self, patch: &Self::Patch);

    fn slot(collections: &Collections) -> &Vec<Self>;
    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

macro_rules! impl_entity {
    (
        $record:ty, $draft:ty, $patch:ty,
        collection: $collection:expr,
        kind: $kind:literal,
        label: $label:ident,
        slot: $slot:ident,
        create: |$id:ident, $owner:ident, $d:ident, $now:ident| $create:expr
    ) => {
        impl Entity for $record {
            type Draft = $draft;
            type Patch = $patch;

            const COLLECTION: Collection = $collection;
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn owner(&self) -> &str {
                &self.owner
            }

            fn label(&self) -> &str {
                &self.$label
            }

            fn prepare_draft(draft: Self::Draft) -> Result<Self::Draft> {
                draft.validated()
            }

            fn prepare_patch(patch: Self::Patch) -> Result<Self::Patch> {
                patch.validated()
            }

            #[allow(unused_variables)]
            fn from_draft(
                $id: String,
                $owner: String,
                $d: Self::Draft,
                $now: DateTime<Utc>,
            ) -> Self {
                $create
            }

            fn apply_patch(&mut self, patch: &Self::Patch) {
                self.apply(patch);
            }

            fn slot(collections: &Collections) -> &Vec<Self> {
                &collections.$slot
            }

            fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
                &mut collections.$slot
            }
        }
    };
}

impl_entity!(
    ClassRecord, NewClass, ClassPatch,
    collection: Collection::Classes,
    kind: "class",
    label: name,
    slot: classes,
    create: |id, owner, draft, now| ClassRecord::create(id, owner, draft)
);

impl_entity!(
    TaskRecord, NewTask, TaskPatch,
    collection: Collection::Tasks,
    kind: "task",
    label: title,
    slot: tasks,
    create: |id, owner, draft, now| TaskRecord::create(id, owner, draft)
);

impl_entity!(
    NoteRecord, NewNote, NotePatch,
    collection: Collection::Notes,
    kind: "note",
    label: title,
    slot: notes,
    create: |id, owner, draft, now| NoteRecord::create(id, owner, draft, now)
);

impl_entity!(
    ContactRecord, NewContact, ContactPatch,
    collection: Collection::Contacts,
    kind: "contact",
    label: name,
    slot: contacts,
    create: |id, owner, draft, now| ContactRecord::create(id, owner, draft)
);

impl_entity!(
    EventRecord, NewEvent, EventPatch,
    collection: Collection::Events,
    kind: "event",
    label: title,
    slot: events,
    create: |id, owner, draft, now| EventRecord::create(id, owner, draft)
);
