//! Mock identity provider

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use skytrack_core::{ExternalIdentity, IdentityProvider};
use skytrack_domain::{AuthError, Result, SkyTrackError};

struct Account {
    password: String,
    identity: ExternalIdentity,
}

/// Scriptable identity provider.
///
/// Accounts are keyed by lowercase email. The federated flow returns whatever
/// identity was scripted with [`MockIdentityProvider::script_federated`].
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    federated: Mutex<Option<ExternalIdentity>>,
    session: Mutex<Option<ExternalIdentity>>,
    ready: AtomicBool,
    fail_sign_out: AtomicBool,
    calls: AtomicUsize,
    next_uid: AtomicUsize,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            federated: Mutex::new(None),
            session: Mutex::new(None),
            ready: AtomicBool::new(true),
            fail_sign_out: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            next_uid: AtomicUsize::new(0),
        }
    }
}

impl MockIdentityProvider {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::default())
    }

    /// Register an account directly, returning its uid
    pub fn register(&self, email: &str, password: &str, display_name: Option<&str>) -> String {
        let uid = self.allocate_uid();
        let identity = ExternalIdentity {
            uid: uid.clone(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
            photo_url: None,
        };
        self.accounts
            .lock()
            .insert(email.to_lowercase(), Account { password: password.to_string(), identity });
        uid
    }

    pub fn script_federated(&self, identity: ExternalIdentity) {
        *self.federated.lock() = Some(identity);
    }

    /// Pretend a session survived from a previous run
    pub fn resume_session(&self, identity: ExternalIdentity) {
        *self.session.lock() = Some(identity);
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    /// Number of async provider calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn display_name(&self, uid: &str) -> Option<String> {
        self.accounts
            .lock()
            .values()
            .find(|account| account.identity.uid == uid)
            .and_then(|account| account.identity.display_name.clone())
    }

    fn allocate_uid(&self) -> String {
        format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ExternalIdentity> {
        self.enter();
        let identity = {
            let accounts = self.accounts.lock();
            match accounts.get(&email.to_lowercase()) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => return Err(AuthError::InvalidCredentials.into()),
            }
        };
        *self.session.lock() = Some(identity.clone());
        Ok(identity)
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<ExternalIdentity> {
        self.enter();
        if self.accounts.lock().contains_key(&email.to_lowercase()) {
            return Err(AuthError::EmailInUse.into());
        }
        let uid = self.register(email, password, Some(display_name));
        let identity = ExternalIdentity {
            uid,
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            photo_url: None,
        };
        *self.session.lock() = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> Result<ExternalIdentity> {
        self.enter();
        let identity = self
            .federated
            .lock()
            .clone()
            .ok_or_else(|| SkyTrackError::Remote("federated sign-in cancelled".to_string()))?;
        *self.session.lock() = Some(identity.clone());
        Ok(identity)
    }

    async fn update_display_name(&self, uid: &str, display_name: &str) -> Result<()> {
        self.enter();
        let mut accounts = self.accounts.lock();
        if let Some(account) = accounts.values_mut().find(|account| account.identity.uid == uid) {
            account.identity.display_name = Some(display_name.to_string());
        }
        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<ExternalIdentity>> {
        self.enter();
        Ok(self.session.lock().clone())
    }

    async fn sign_out(&self) -> Result<()> {
        self.enter();
        *self.session.lock() = None;
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(SkyTrackError::Remote("sign-out request failed".to_string()));
        }
        Ok(())
    }
}
