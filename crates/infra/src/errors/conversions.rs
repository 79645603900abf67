//! Conversions from external infrastructure errors into domain errors.
//!
//! Storage failures surface as `SkyTrackError::Remote` with an opaque
//! message. Failures of the local machinery (task joins, credential hashing,
//! file access) surface as `SkyTrackError::Internal`.

use rusqlite::Error as SqlError;
use serde_json::Error as JsonError;
use skytrack_domain::SkyTrackError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SkyTrackError);

impl From<InfraError> for SkyTrackError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SkyTrackError> for InfraError {
    fn from(value: SkyTrackError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSkyTrackError {
    fn into_skytrack(self) -> SkyTrackError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SkyTrackError */
/* -------------------------------------------------------------------------- */

impl IntoSkyTrackError for SqlError {
    fn into_skytrack(self) -> SkyTrackError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => SkyTrackError::Remote("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        SkyTrackError::Remote("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => {
                        SkyTrackError::Remote(format!("constraint violation: {message}"))
                    }
                    _ => SkyTrackError::Remote(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                SkyTrackError::Remote(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SkyTrackError::Remote(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => SkyTrackError::Remote(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => SkyTrackError::Remote(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_skytrack())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SkyTrackError */
/* -------------------------------------------------------------------------- */

impl IntoSkyTrackError for r2d2::Error {
    fn into_skytrack(self) -> SkyTrackError {
        SkyTrackError::Remote(format!("connection pool: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        Self(value.into_skytrack())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SkyTrackError */
/* -------------------------------------------------------------------------- */

impl IntoSkyTrackError for JsonError {
    fn into_skytrack(self) -> SkyTrackError {
        SkyTrackError::Remote(format!("malformed stored document: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        Self(value.into_skytrack())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → SkyTrackError */
/* -------------------------------------------------------------------------- */

impl IntoSkyTrackError for JoinError {
    fn into_skytrack(self) -> SkyTrackError {
        SkyTrackError::Internal(format!("Task join error: {self}"))
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        Self(value.into_skytrack())
    }
}

/* -------------------------------------------------------------------------- */
/* argon2 password hash errors → SkyTrackError */
/* -------------------------------------------------------------------------- */

impl IntoSkyTrackError for argon2::password_hash::Error {
    fn into_skytrack(self) -> SkyTrackError {
        SkyTrackError::Internal(format!("credential hashing failed: {self}"))
    }
}

impl From<argon2::password_hash::Error> for InfraError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self(value.into_skytrack())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → SkyTrackError */
/* -------------------------------------------------------------------------- */

impl IntoSkyTrackError for std::io::Error {
    fn into_skytrack(self) -> SkyTrackError {
        SkyTrackError::Internal(format!("I/O error: {self}"))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_skytrack())
    }
}

/// Map any supported infrastructure error straight to the domain error.
pub fn map_err<E>(err: E) -> SkyTrackError
where
    InfraError: From<E>,
{
    SkyTrackError::from(InfraError::from(err))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
