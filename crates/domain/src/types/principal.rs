//! Authenticated principal
//!
//! Stored in the `users` collection under the principal's uid.

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_blank, Result};
use crate::impl_domain_enum_conversions;

/// Role chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Tutor,
}

impl_domain_enum_conversions!(Role {
    Student => "student",
    Teacher => "teacher",
    Tutor => "tutor",
});

/// The authenticated user identity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: Role,
}

impl Principal {
    /// Display name derived from an email address when no name is known.
    pub fn fallback_name(email: &str) -> String {
        email.split('@').next().unwrap_or(email).to_string()
    }

    /// Merge a profile update; unspecified fields stay unchanged.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(photo_url) = &update.photo_url {
            self.photo_url = Some(photo_url.clone());
        }
    }
}

/// Partial update of the mutable principal fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), photo_url: None }
    }

    pub fn photo_url(url: impl Into<String>) -> Self {
        Self { name: None, photo_url: Some(url.into()) }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.photo_url.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        Ok(())
    }
}
