//! Principal change subscription

use skytrack_domain::Principal;
use tokio::sync::watch;

/// Receives the current principal every time it changes.
///
/// Backed by a watch channel: a slow subscriber skips intermediate values and
/// always observes the latest one. Dropping the subscription (or calling
/// [`PrincipalSubscription::unsubscribe`]) cancels it.
#[derive(Debug, Clone)]
pub struct PrincipalSubscription {
    rx: watch::Receiver<Option<Principal>>,
}

impl PrincipalSubscription {
    pub(crate) fn new(rx: watch::Receiver<Option<Principal>>) -> Self {
        Self { rx }
    }

    /// Principal at the time of the call.
    pub fn current(&self) -> Option<Principal> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the emitting service has been dropped.
    pub async fn next(&mut self) -> Option<Option<Principal>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Stop receiving changes.
    pub fn unsubscribe(self) {}
}
