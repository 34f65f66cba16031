//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::sqlx_error_kind, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input the client must fix
    #[error("{0}")]
    Validation(String),

    /// Unknown email, missing digest or wrong password. One variant for all
    /// three so responses cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, invalid or expired
    #[error("Invalid or expired token")]
    Unauthenticated,

    /// Authenticated, but the role does not allow the action
    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Cooperative not found")]
    CooperativeNotFound,

    /// Email or phone number already registered
    #[error("User with this email or phone number already exists")]
    DuplicateUser,

    /// Phone number already used by another account
    #[error("Phone number is already registered")]
    PhoneNumberTaken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::CooperativeNotFound => ErrorKind::NotFound,
            AuthError::DuplicateUser | AuthError::PhoneNumberTaken => ErrorKind::Conflict,
            AuthError::Database(e) => match sqlx_error_kind(e) {
                ErrorKind::ServiceUnavailable => ErrorKind::ServiceUnavailable,
                _ => ErrorKind::InternalServerError,
            },
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Server-side detail stays in the internal message
    /// and is replaced by a generic one when rendered.
    pub fn to_app_error(&self) -> AppError {
        match self.kind() {
            ErrorKind::ServiceUnavailable => {
                AppError::service_unavailable("Service temporarily unavailable")
            }
            kind => AppError::new(kind, self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Forbidden => {
                tracing::warn!("Role check denied request");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report through `AppError`; client errors keep their message.
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::token::TokenError> for AuthError {
    fn from(err: platform::token::TokenError) -> Self {
        match err {
            platform::token::TokenError::Invalid => AuthError::Unauthenticated,
            platform::token::TokenError::Signing(e) => AuthError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::Validation("x".into()).kind().status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.kind().status_code(), 401);
        assert_eq!(AuthError::Unauthenticated.kind().status_code(), 401);
        assert_eq!(AuthError::Forbidden.kind().status_code(), 403);
        assert_eq!(AuthError::CooperativeNotFound.kind().status_code(), 404);
        assert_eq!(AuthError::DuplicateUser.kind().status_code(), 409);
        assert_eq!(AuthError::PhoneNumberTaken.kind().status_code(), 409);
        assert_eq!(AuthError::Internal("boom".into()).kind().status_code(), 500);
        assert_eq!(AuthError::Database(sqlx::Error::PoolTimedOut).kind().status_code(), 503);
        assert_eq!(AuthError::Database(sqlx::Error::RowNotFound).kind().status_code(), 500);
    }

    #[test]
    fn test_internal_detail_not_public() {
        let app = AuthError::Internal("pool exhausted at 10.0.0.3".into()).to_app_error();
        assert_eq!(app.public_message(), "Internal server error");
    }

    #[test]
    fn test_bad_request_app_error_becomes_validation() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));

        let err: AuthError = AppError::internal("boom").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
