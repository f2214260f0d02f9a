//! Authentication and authorization logic.
//!
//! Provides password hashing, the database-backed session store and the
//! project role checks shared by `planboard_api` and any resolver layer.

pub mod authorization;
pub mod password;
pub mod queries;
pub mod roles;
pub mod session;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No matching, unexpired session. Deliberately covers "not found" too.
    #[error("Invalid or expired session")]
    InvalidOrExpiredSession,

    #[error("Unauthorized")]
    Unauthorized,

    /// Known caller, insufficient project role.
    #[error("Forbidden")]
    Forbidden,

    #[error("Password must be at least {min} characters", min = password::MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Password must be at most {max} bytes", max = password::MAX_PASSWORD_BYTES)]
    PasswordTooLong,

    #[error("Invalid credentials")]
    CredentialError,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
