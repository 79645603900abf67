//! Keeps an entity store bound to the authenticated principal
//!
//! The binding runs as one background task with a tracked join handle and an
//! explicit cancellation token. Stopping waits for the task with a timeout.

use std::sync::Arc;
use std::time::Duration;

use skytrack_domain::{Result, SkyTrackError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::service::EntityStore;
use crate::identity::AuthService;

/// Maximum time [`StoreSync::stop`] waits for the task to finish
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Background task forwarding principal changes to an [`EntityStore`]
pub struct StoreSync {
    store: Arc<EntityStore>,
    auth: Arc<AuthService>,
    handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
}

impl StoreSync {
    /// Not started; call [`Self::start`]
    pub fn new(store: Arc<EntityStore>, auth: Arc<AuthService>) -> Self {
        Self { store, auth, handle: None, cancellation: CancellationToken::new() }
    }

    /// Apply the current principal, then follow every change in the background
    ///
    /// A failed initial load is logged; the task still starts.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(SkyTrackError::Internal("store sync is already running".to_string()));
        }

        self.cancellation = CancellationToken::new();
        let mut subscription = self.auth.subscribe();

        if let Err(err) = self.store.follow(&self.auth).await {
            warn!(error = %err, "initial collection load failed");
        }

        let cancel = self.cancellation.clone();
        let store = Arc::clone(&self.store);
        let auth = Arc::clone(&self.auth);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!("store sync cancelled");
                        break;
                    }
                    change = subscription.next() => {
                        if change.is_none() {
                            debug!("principal stream closed");
                            break;
                        }
                        // Whatever the emitted value, apply the latest principal
                        if let Err(err) = store.follow(&auth).await {
                            warn!(error = %err, "failed to load collections for principal");
                        }
                    }
                }
            }
        });

        self.handle = Some(handle);
        info!(event = "start", "store sync started");
        Ok(())
    }

    /// Cancel the task and wait for it to finish
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<()> {
        self.cancellation.cancel();

        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match tokio::time::timeout(STOP_TIMEOUT, handle).await {
            Ok(Ok(())) => {
                info!(event = "stop", "store sync stopped");
                Ok(())
            }
            Ok(Err(err)) => Err(SkyTrackError::Internal(format!("store sync task failed: {err}"))),
            Err(_) => {
                warn!(timeout_secs = STOP_TIMEOUT.as_secs(), "store sync did not stop in time");
                Err(SkyTrackError::Internal("timed out stopping store sync".to_string()))
            }
        }
    }

    /// Whether the task has been started and has not finished
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for StoreSync {
    fn drop(&mut self) {
        if self.is_running() {
            warn!(event = "drop_cancel", "StoreSync dropped while running; cancelling task");
            self.cancellation.cancel();
        }
    }
}
