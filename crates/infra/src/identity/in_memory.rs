//! Process-local identity provider
//!
//! Email/password accounts with argon2 credential hashes, a scripted
//! federated identity and a readiness switch. Hashing and verification run
//! on the blocking pool.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use parking_lot::RwLock;
use skytrack_core::{ExternalIdentity, IdentityProvider};
use skytrack_domain::{AuthError, Result, SkyTrackError};
use tokio::task;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::errors::conversions::map_err;

#[derive(Debug, Clone)]
struct Account {
    password_hash: String,
    identity: ExternalIdentity,
}

/// Identity provider kept in process memory
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    /// Keyed by lowercase email
    accounts: RwLock<HashMap<String, Account>>,
    federated: RwLock<Option<ExternalIdentity>>,
    session: RwLock<Option<ExternalIdentity>>,
    ready: AtomicBool,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            federated: RwLock::new(None),
            session: RwLock::new(None),
            ready: AtomicBool::new(true),
        }
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity returned by the next federated sign-ins
    #[must_use]
    pub fn with_federated_identity(self, identity: ExternalIdentity) -> Self {
        *self.federated.write() = Some(identity);
        self
    }

    /// Start with an already authenticated session
    #[must_use]
    pub fn with_session(self, identity: ExternalIdentity) -> Self {
        *self.session.write() = Some(identity);
        self
    }

    pub fn set_federated_identity(&self, identity: Option<ExternalIdentity>) {
        *self.federated.write() = identity;
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Number of email/password accounts
    pub fn account_count(&self) -> usize {
        self.accounts.read().len()
    }

    fn remember(&self, identity: &ExternalIdentity) {
        *self.session.write() = Some(identity.clone());
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ExternalIdentity> {
        let Some(account) = self.accounts.read().get(&email.to_lowercase()).cloned() else {
            debug!("unknown account");
            return Err(AuthError::InvalidCredentials.into());
        };

        let password = password.to_string();
        let hash = account.password_hash.clone();
        let matches = task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(map_err)??;
        if !matches {
            debug!(uid = %account.identity.uid, "password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        self.remember(&account.identity);
        Ok(account.identity)
    }

    #[instrument(skip(self, password))]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<ExternalIdentity> {
        let key = email.to_lowercase();
        if self.accounts.read().contains_key(&key) {
            return Err(AuthError::EmailInUse.into());
        }

        let password = password.to_string();
        let password_hash =
            task::spawn_blocking(move || hash_password(&password)).await.map_err(map_err)??;

        let identity = ExternalIdentity {
            uid: Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            photo_url: None,
        };

        {
            let mut accounts = self.accounts.write();
            // Another registration may have won while hashing.
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailInUse.into());
            }
            accounts.insert(key, Account { password_hash, identity: identity.clone() });
        }

        info!(uid = %identity.uid, "account created");
        self.remember(&identity);
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> Result<ExternalIdentity> {
        let identity = self.federated.read().clone().ok_or_else(|| {
            SkyTrackError::Remote("federated sign-in is not available".to_string())
        })?;
        self.remember(&identity);
        Ok(identity)
    }

    async fn update_display_name(&self, uid: &str, display_name: &str) -> Result<()> {
        let rename = |identity: &mut ExternalIdentity| {
            if identity.uid == uid {
                identity.display_name = Some(display_name.to_string());
            }
        };

        for account in self.accounts.write().values_mut() {
            rename(&mut account.identity);
        }
        if let Some(identity) = self.federated.write().as_mut() {
            rename(identity);
        }
        if let Some(identity) = self.session.write().as_mut() {
            rename(identity);
        }
        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<ExternalIdentity>> {
        Ok(self.session.read().clone())
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session.write() = None;
        Ok(())
    }
}

// =============================================================================
// Credential hashing
// =============================================================================

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt).map_err(map_err)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(map_err)?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}
