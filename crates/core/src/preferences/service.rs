//! Preferences service

use std::sync::Arc;

use skytrack_domain::{LanguageCode, Result, ThemeColor, ThemeMode, UserPreferences};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use super::ports::PreferenceStore;

/// Holds the active preferences and persists every change.
///
/// A change is published only after the store confirmed it.
pub struct PreferencesService {
    store: Arc<dyn PreferenceStore>,
    current: watch::Sender<UserPreferences>,
}

impl PreferencesService {
    /// Start from defaults; call [`Self::load`] to pick up saved values
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let (current, _) = watch::channel(UserPreferences::default());
        Self { store, current }
    }

    /// Read saved preferences, falling back to defaults
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<UserPreferences> {
        let preferences = match self.store.load().await? {
            Some(saved) => saved,
            None => {
                debug!("no saved preferences; using defaults");
                UserPreferences::default()
            }
        };
        self.current.send_replace(preferences);
        Ok(preferences)
    }

    pub fn current(&self) -> UserPreferences {
        *self.current.borrow()
    }

    /// Observe preference changes
    pub fn subscribe(&self) -> watch::Receiver<UserPreferences> {
        self.current.subscribe()
    }

    pub async fn set_language(&self, language: LanguageCode) -> Result<UserPreferences> {
        self.change(|preferences| preferences.language = language).await
    }

    pub async fn set_theme(&self, theme: ThemeMode) -> Result<UserPreferences> {
        self.change(|preferences| preferences.theme = theme).await
    }

    pub async fn set_theme_color(&self, theme_color: ThemeColor) -> Result<UserPreferences> {
        self.change(|preferences| preferences.theme_color = theme_color).await
    }

    async fn change(&self, edit: impl FnOnce(&mut UserPreferences)) -> Result<UserPreferences> {
        let mut next = self.current();
        edit(&mut next);
        if next == self.current() {
            return Ok(next);
        }

        self.store.save(&next).await?;
        self.current.send_replace(next);
        info!(
            language = %next.language,
            theme = %next.theme,
            theme_color = %next.theme_color,
            "preferences saved"
        );
        Ok(next)
    }
}
