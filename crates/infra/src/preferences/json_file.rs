//! Preferences persisted as a JSON file on the device
//!
//! Writes go to a sibling `.tmp` file that is renamed over the target, so a
//! crash mid-write leaves the previous preferences intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use skytrack_core::PreferenceStore;
use skytrack_domain::{Result, UserPreferences};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::conversions::map_err;

/// JSON file implementation of `PreferenceStore`
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn load(&self) -> Result<Option<UserPreferences>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(map_err(err)),
        };

        match serde_json::from_str(&contents) {
            Ok(preferences) => Ok(Some(preferences)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable preferences file");
                Ok(None)
            }
        }
    }

    async fn save(&self, preferences: &UserPreferences) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(map_err)?;
        }

        let json = serde_json::to_vec_pretty(preferences).map_err(map_err)?;
        let staging = self.staging_path();
        fs::write(&staging, json).await.map_err(map_err)?;
        fs::rename(&staging, &self.path).await.map_err(map_err)?;

        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
