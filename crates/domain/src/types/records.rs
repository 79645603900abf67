//! Entity records owned by a principal
//!
//! Every entity kind comes in three shapes:
//! - the record as persisted and held in memory,
//! - a `New*` draft with the caller-provided fields of a create,
//! - a `*Patch` with the optional fields of a partial update.
//!
//! `classID` is a weak reference: it may name a class that no longer exists.
//! Patch fields for optional record fields are tri-state: absent leaves the
//! field alone, `Some(None)` clears it, `Some(Some(v))` sets it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{require_non_blank, Result};
use crate::impl_domain_enum_conversions;

/// Treat an empty weak reference as "no class".
fn normalize_ref(class_id: Option<String>) -> Option<String> {
    class_id.filter(|id| !id.trim().is_empty())
}

fn normalize_ref_patch(class_id: Option<Option<String>>) -> Option<Option<String>> {
    class_id.map(normalize_ref)
}

fn merge<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

// ============================================================================
// Classes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewClass {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self { name: name.into(), color: color.into() }
    }

    pub fn validated(self) -> Result<Self> {
        require_non_blank("name", &self.name)?;
        Ok(self)
    }
}

impl ClassPatch {
    pub fn validated(self) -> Result<Self> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        Ok(self)
    }
}

impl ClassRecord {
    pub fn create(id: String, owner: String, draft: NewClass) -> Self {
        Self { id, name: draft.name, color: draft.color, owner }
    }

    pub fn apply(&mut self, patch: &ClassPatch) {
        merge(&mut self.name, patch.name.as_ref());
        merge(&mut self.color, patch.color.as_ref());
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// Progress of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl_domain_enum_conversions!(TaskStatus {
    Todo => "todo",
    InProgress => "in-progress",
    Done => "done",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(rename = "classID", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(
        rename = "classID",
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub class_id: Option<Option<String>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    #[must_use]
    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn validated(mut self) -> Result<Self> {
        require_non_blank("title", &self.title)?;
        self.class_id = normalize_ref(self.class_id);
        Ok(self)
    }
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn validated(mut self) -> Result<Self> {
        if let Some(title) = &self.title {
            require_non_blank("title", title)?;
        }
        self.class_id = normalize_ref_patch(self.class_id);
        Ok(self)
    }
}

impl TaskRecord {
    pub fn create(id: String, owner: String, draft: NewTask) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
            class_id: draft.class_id,
            owner,
        }
    }

    pub fn apply(&mut self, patch: &TaskPatch) {
        merge(&mut self.title, patch.title.as_ref());
        merge(&mut self.description, patch.description.as_ref());
        merge(&mut self.status, patch.status.as_ref());
        merge(&mut self.due_date, patch.due_date.as_ref());
        merge(&mut self.class_id, patch.class_id.as_ref());
    }
}

// ============================================================================
// Notes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "classID", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    /// Attachment references in the order the user added them.
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub class_id: Option<String>,
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        rename = "classID",
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub class_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn validated(mut self) -> Result<Self> {
        require_non_blank("title", &self.title)?;
        self.class_id = normalize_ref(self.class_id);
        Ok(self)
    }
}

impl NotePatch {
    pub fn validated(mut self) -> Result<Self> {
        if let Some(title) = &self.title {
            require_non_blank("title", title)?;
        }
        self.class_id = normalize_ref_patch(self.class_id);
        Ok(self)
    }
}

impl NoteRecord {
    pub fn create(id: String, owner: String, draft: NewNote, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            class_id: draft.class_id,
            attachments: draft.attachments,
            created_at,
            owner,
        }
    }

    pub fn apply(&mut self, patch: &NotePatch) {
        merge(&mut self.title, patch.title.as_ref());
        merge(&mut self.content, patch.content.as_ref());
        merge(&mut self.class_id, patch.class_id.as_ref());
        merge(&mut self.attachments, patch.attachments.as_ref());
    }
}

// ============================================================================
// Contacts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "classID", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "classID",
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub class_id: Option<Option<String>>,
}

impl NewContact {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), class_id: None }
    }

    pub fn validated(mut self) -> Result<Self> {
        require_non_blank("name", &self.name)?;
        self.class_id = normalize_ref(self.class_id);
        Ok(self)
    }
}

impl ContactPatch {
    pub fn validated(mut self) -> Result<Self> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        self.class_id = normalize_ref_patch(self.class_id);
        Ok(self)
    }
}

impl ContactRecord {
    pub fn create(id: String, owner: String, draft: NewContact) -> Self {
        Self { id, name: draft.name, class_id: draft.class_id, owner }
    }

    pub fn apply(&mut self, patch: &ContactPatch) {
        merge(&mut self.name, patch.name.as_ref());
        merge(&mut self.class_id, patch.class_id.as_ref());
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "classID", default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(
        rename = "classID",
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub class_id: Option<Option<String>>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self { title: title.into(), description: String::new(), date, class_id: None }
    }

    #[must_use]
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn validated(mut self) -> Result<Self> {
        require_non_blank("title", &self.title)?;
        self.class_id = normalize_ref(self.class_id);
        Ok(self)
    }
}

impl EventPatch {
    /// Move an event to another moment (calendar drag and drop).
    pub fn reschedule(date: DateTime<Utc>) -> Self {
        Self { date: Some(date), ..Self::default() }
    }

    pub fn validated(mut self) -> Result<Self> {
        if let Some(title) = &self.title {
            require_non_blank("title", title)?;
        }
        self.class_id = normalize_ref_patch(self.class_id);
        Ok(self)
    }
}

impl EventRecord {
    pub fn create(id: String, owner: String, draft: NewEvent) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            class_id: draft.class_id,
            owner,
        }
    }

    pub fn apply(&mut self, patch: &EventPatch) {
        merge(&mut self.title, patch.title.as_ref());
        merge(&mut self.description, patch.description.as_ref());
        merge(&mut self.date, patch.date.as_ref());
        merge(&mut self.class_id, patch.class_id.as_ref());
    }
}
