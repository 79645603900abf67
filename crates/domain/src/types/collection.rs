//! Names of the remote document collections

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// A top-level collection in the remote document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Classes,
    Tasks,
    Notes,
    Contacts,
    Events,
}

impl_domain_enum_conversions!(Collection {
    Users => "users",
    Classes => "classes",
    Tasks => "tasks",
    Notes => "notes",
    Contacts => "contacts",
    Events => "events",
});

impl Collection {
    /// Collections holding owner-scoped entity records.
    pub const ENTITIES: [Self; 5] =
        [Self::Classes, Self::Tasks, Self::Notes, Self::Contacts, Self::Events];
}
