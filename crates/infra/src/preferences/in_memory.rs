use async_trait::async_trait;
use parking_lot::Mutex;
use skytrack_core::PreferenceStore;
use skytrack_domain::{Result, UserPreferences};

/// Preference store that forgets everything when the process exits
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    saved: Mutex<Option<UserPreferences>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load(&self) -> Result<Option<UserPreferences>> {
        Ok(*self.saved.lock())
    }

    async fn save(&self, preferences: &UserPreferences) -> Result<()> {
        *self.saved.lock() = Some(*preferences);
        Ok(())
    }
}
