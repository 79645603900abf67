//! Port interfaces for the hosted identity provider
//!
//! The provider only knows accounts (uid, email, display name, photo). Roles
//! and the rest of the principal live in the `users` document collection and
//! are handled by [`super::AuthService`].

use async_trait::async_trait;
use skytrack_domain::Result;

/// Account as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Trait for the authentication capability consumed by the identity adapter
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether the provider finished initialising
    fn is_ready(&self) -> bool;

    /// Verify email/password credentials
    ///
    /// Fails with `AuthError::InvalidCredentials` for unknown accounts or a
    /// wrong password.
    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<ExternalIdentity>;

    /// Create an email/password account
    ///
    /// Fails with `AuthError::EmailInUse` when the email is taken.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<ExternalIdentity>;

    /// Run the federated (third-party) sign-in flow
    async fn sign_in_federated(&self) -> Result<ExternalIdentity>;

    /// Change the display name stored with the account
    async fn update_display_name(&self, uid: &str, display_name: &str) -> Result<()>;

    /// Account restored from a previous session, if any
    async fn current_identity(&self) -> Result<Option<ExternalIdentity>>;

    /// End the provider session
    async fn sign_out(&self) -> Result<()>;
}
