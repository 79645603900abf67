//! # SkyTrack Core
//!
//! Application logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the document store, the identity provider
//!   and preference storage
//! - The authentication service and the principal stream
//! - The entity store mirroring the principal's collections
//! - Search and the derived views used by the screens
//!
//! ## Architecture Principles
//! - Only depends on `skytrack-domain`
//! - No database, network or platform code
//! - All external capabilities via traits

pub mod identity;
pub mod persistence;
pub mod preferences;
pub mod search;
pub mod store;
pub mod views;

pub use identity::ports::{ExternalIdentity, IdentityProvider};
pub use identity::{AuthService, PrincipalSubscription};
pub use persistence::ports::{Document, DocumentStore, FieldFilter, StoredDocument};
pub use preferences::ports::PreferenceStore;
pub use preferences::PreferencesService;
pub use store::{Collections, Entity, EntityStore, StoreSync};
pub use views::{ClassFilter, NoteFilter, NoteGroup};
