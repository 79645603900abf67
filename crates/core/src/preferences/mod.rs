//! Language and theme preferences

pub mod ports;
pub mod service;

pub use ports::PreferenceStore;
pub use service::PreferencesService;
