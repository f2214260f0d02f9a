//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;
use planboard_core::auth::AuthError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Internal(m) => {
                tracing::error!(error = %m, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidOrExpiredSession | AuthError::Unauthorized => {
                AppError::Unauthorized("Unauthorized".into())
            }
            AuthError::CredentialError => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::Forbidden => AppError::Forbidden("Insufficient project role".into()),
            e @ (AuthError::PasswordTooShort | AuthError::PasswordTooLong) => {
                AppError::Validation(e.to_string())
            }
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Storage(e) => AppError::Internal(e.to_string()),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(e: AuthError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(status(AuthError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::InvalidOrExpiredSession), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::CredentialError), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status(AuthError::PasswordTooShort), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::PasswordTooLong), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AuthError::Storage(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
