//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity failures surfaced by the authentication flow
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already in use")]
    EmailInUse,

    #[error("a role must be chosen before registering")]
    RoleRequired,

    #[error("identity provider is not ready")]
    NotReady,

    #[error("no authenticated principal")]
    Unauthenticated,
}

/// Main error type for SkyTrack
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SkyTrackError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(AuthError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SkyTrackError {
    /// Error for a required field that was left blank.
    pub fn blank(field: &str) -> Self {
        Self::Validation(format!("{field} must not be blank"))
    }

    /// Error for a record id that is not present in the current collection.
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound(format!("{kind} {id}"))
    }

    /// Whether the error originated in an external adapter.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// The auth failure carried by this error, if any.
    pub fn auth_kind(&self) -> Option<AuthError> {
        match self {
            Self::Auth(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<AuthError> for SkyTrackError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

/// Result type alias for SkyTrack operations
pub type Result<T> = std::result::Result<T, SkyTrackError>;

/// Fail with a validation error when `value` is empty or whitespace only.
pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SkyTrackError::blank(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(require_non_blank("title", "  \t").is_err());
        assert!(require_non_blank("title", "").is_err());
        assert!(require_non_blank("title", " Algebra ").is_ok());
    }

    #[test]
    fn auth_errors_convert_and_round_trip_through_serde() {
        let err: SkyTrackError = AuthError::EmailInUse.into();
        assert_eq!(err.auth_kind(), Some(AuthError::EmailInUse));

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Auth");
        assert_eq!(json["message"], "EmailInUse");

        let back: SkyTrackError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn display_includes_category() {
        let err = SkyTrackError::blank("name");
        assert_eq!(err.to_string(), "Validation error: name must not be blank");
        assert!(!err.is_remote());
        assert!(SkyTrackError::Remote("timeout".into()).is_remote());
    }
}
