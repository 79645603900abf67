//! Device preference store adapters

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryPreferenceStore;
pub use json_file::JsonFilePreferenceStore;
