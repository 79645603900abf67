//! Port interface for device-local preference storage

use async_trait::async_trait;
use skytrack_domain::{Result, UserPreferences};

/// Trait for persisting [`UserPreferences`] on the device
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored preferences, `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<UserPreferences>>;

    async fn save(&self, preferences: &UserPreferences) -> Result<()>;
}
