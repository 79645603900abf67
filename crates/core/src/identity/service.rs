//! Identity adapter - sign-in flows and the principal stream

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use skytrack_domain::constants::MIN_PASSWORD_LENGTH;
use skytrack_domain::{
    require_non_blank, AuthError, Collection, Principal, ProfileUpdate, Result, Role,
    SkyTrackError,
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::ports::{ExternalIdentity, IdentityProvider};
use super::subscription::PrincipalSubscription;
use crate::persistence::{codec, DocumentStore};

/// Authentication service
///
/// Wraps the identity provider and the `users` collection, and publishes the
/// current [`Principal`] (or `None` when signed out). A failed operation never
/// changes the published principal.
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
    principal: watch::Sender<Option<Principal>>,
    loading: watch::Sender<bool>,
    in_flight: AtomicUsize,
}

/// Keeps `loading` raised while at least one operation is in flight.
struct LoadingGuard<'a> {
    service: &'a AuthService,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.service.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.service.loading.send_replace(false);
        }
    }
}

impl AuthService {
    /// Create a signed-out service
    pub fn new(provider: Arc<dyn IdentityProvider>, documents: Arc<dyn DocumentStore>) -> Self {
        let (principal, _) = watch::channel(None);
        let (loading, _) = watch::channel(false);
        Self { provider, documents, principal, loading, in_flight: AtomicUsize::new(0) }
    }

    /// Currently authenticated principal
    pub fn current(&self) -> Option<Principal> {
        self.principal.borrow().clone()
    }

    /// Subscribe to principal changes
    pub fn subscribe(&self) -> PrincipalSubscription {
        PrincipalSubscription::new(self.principal.subscribe())
    }

    /// Whether an identity operation is in flight
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Observe the loading flag
    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Pick up a session the provider already holds (app start)
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> Result<Option<Principal>> {
        let _loading = self.begin();
        self.ensure_ready()?;

        let Some(identity) = self.provider.current_identity().await? else {
            debug!("no session to restore");
            self.emit(None);
            return Ok(None);
        };

        let principal = self.ensure_principal(&identity, Role::Student).await?;
        info!(uid = %principal.uid, "session restored");
        self.emit(Some(principal.clone()));
        Ok(Some(principal))
    }

    /// Email/password sign-in
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Principal> {
        let _loading = self.begin();
        self.ensure_ready()?;

        let identity = self.provider.sign_in_with_password(email, password).await?;
        let principal = self.ensure_principal(&identity, Role::Student).await?;

        info!(uid = %principal.uid, "signed in");
        self.emit(Some(principal.clone()));
        Ok(principal)
    }

    /// Email/password registration with an explicit role
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<Principal> {
        require_non_blank("email", email)?;
        require_non_blank("name", name)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(SkyTrackError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let _loading = self.begin();
        self.ensure_ready()?;

        let identity = self.provider.create_account(email, password, name).await?;
        if self.documents.get(Collection::Users, &identity.uid).await?.is_some() {
            warn!(uid = %identity.uid, "principal document already provisioned");
            return Err(AuthError::EmailInUse.into());
        }

        let principal = Principal {
            uid: identity.uid,
            name: name.to_string(),
            email: identity.email,
            photo_url: identity.photo_url,
            role,
        };
        self.documents.set(Collection::Users, &principal.uid, codec::encode(&principal)?).await?;

        info!(uid = %principal.uid, role = %principal.role, "registered");
        self.emit(Some(principal.clone()));
        Ok(principal)
    }

    /// Federated sign-in; first-time accounts become students
    #[instrument(skip(self))]
    pub async fn sign_in_with_provider(&self) -> Result<Principal> {
        self.federated(Role::Student).await
    }

    /// Federated registration; `role` only applies to first-time accounts
    #[instrument(skip(self))]
    pub async fn sign_up_with_provider(&self, role: Option<Role>) -> Result<Principal> {
        let role = role.ok_or(AuthError::RoleRequired)?;
        self.federated(role).await
    }

    /// Merge name/photo into the current principal
    ///
    /// Returns `Ok(None)` without touching anything when signed out.
    #[instrument(skip(self))]
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Option<Principal>> {
        let Some(principal) = self.current() else {
            debug!("profile update ignored while signed out");
            return Ok(None);
        };
        update.validate()?;
        if update.is_empty() {
            return Ok(Some(principal));
        }

        let _loading = self.begin();
        self.ensure_ready()?;

        if let Some(name) = &update.name {
            self.provider.update_display_name(&principal.uid, name).await?;
        }
        self.documents
            .update(Collection::Users, &principal.uid, codec::encode_patch(&update)?)
            .await?;

        // Merge into whatever is current now, unless the session moved on.
        self.principal.send_if_modified(|current| match current {
            Some(current) if current.uid == principal.uid => {
                current.apply(&update);
                true
            }
            _ => false,
        });

        let mut merged = principal;
        merged.apply(&update);
        info!(uid = %merged.uid, "profile updated");
        Ok(Some(merged))
    }

    /// Sign out; the principal is cleared even if the provider call fails
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<()> {
        let _loading = self.begin();
        let result =
            if self.provider.is_ready() { self.provider.sign_out().await } else { Ok(()) };

        self.emit(None);
        match &result {
            Ok(()) => info!("signed out"),
            Err(err) => warn!(error = %err, "provider sign-out failed; local session cleared"),
        }
        result
    }

    async fn federated(&self, role_for_new: Role) -> Result<Principal> {
        let _loading = self.begin();
        self.ensure_ready()?;

        let identity = self.provider.sign_in_federated().await?;
        let principal = self.ensure_principal(&identity, role_for_new).await?;

        info!(uid = %principal.uid, role = %principal.role, "federated sign-in");
        self.emit(Some(principal.clone()));
        Ok(principal)
    }

    /// Load the principal document, creating it on first sign-in.
    ///
    /// An existing document is returned as stored: its role is never replaced
    /// by `role_for_new`.
    async fn ensure_principal(
        &self,
        identity: &ExternalIdentity,
        role_for_new: Role,
    ) -> Result<Principal> {
        if let Some(document) = self.documents.get(Collection::Users, &identity.uid).await? {
            return codec::decode(Collection::Users, document);
        }

        let name = identity
            .display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| Principal::fallback_name(&identity.email));

        let principal = Principal {
            uid: identity.uid.clone(),
            name,
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            role: role_for_new,
        };
        self.documents.set(Collection::Users, &principal.uid, codec::encode(&principal)?).await?;

        info!(uid = %principal.uid, role = %principal.role, "principal document created");
        Ok(principal)
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.provider.is_ready() {
            Ok(())
        } else {
            Err(AuthError::NotReady.into())
        }
    }

    fn emit(&self, principal: Option<Principal>) {
        self.principal.send_replace(principal);
    }

    fn begin(&self) -> LoadingGuard<'_> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.loading.send_replace(true);
        }
        LoadingGuard { service: self }
    }
}
