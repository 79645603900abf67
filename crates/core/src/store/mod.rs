//! Entity store and its binding to the principal stream

pub mod entity;
pub mod service;
pub mod state;
pub mod sync;

pub use entity::Entity;
pub use service::EntityStore;
pub use state::Collections;
pub use sync::StoreSync;
