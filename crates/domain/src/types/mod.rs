//! Domain types and models

pub mod collection;
pub mod preferences;
pub mod principal;
pub mod records;
pub mod search;

pub use collection::Collection;
pub use preferences::{LanguageCode, ThemeColor, ThemeMode, UserPreferences};
pub use principal::{Principal, ProfileUpdate, Role};
pub use records::{
    ClassPatch, ClassRecord, ContactPatch, ContactRecord, EventPatch, EventRecord, NewClass,
    NewContact, NewEvent, NewNote, NewTask, NotePatch, NoteRecord, TaskPatch, TaskRecord,
    TaskStatus,
};
pub use search::SearchResults;
