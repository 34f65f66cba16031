//! Error conversions
//!
//! Classification of database errors into [`ErrorKind`], and the HTTP
//! rendering of [`AppError`] as a failed envelope.

#[cfg(feature = "axum")]
use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// Classify a database error without consuming it
#[cfg(feature = "sqlx")]
pub fn sqlx_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ErrorKind::Conflict,
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            ErrorKind::BadRequest
        }
        _ => ErrorKind::InternalServerError,
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use crate::response::ApiResponse;
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = ApiResponse::<()>::failure(self.public_message());

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlx_error_kinds() {
        assert_eq!(sqlx_error_kind(&sqlx::Error::RowNotFound), ErrorKind::NotFound);
        assert_eq!(
            sqlx_error_kind(&sqlx::Error::PoolTimedOut),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            sqlx_error_kind(&sqlx::Error::Protocol("bad frame".into())),
            ErrorKind::InternalServerError
        );
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_internal_error_renders_opaque_status() {
        use axum::response::IntoResponse;

        let response = AppError::internal("secret detail").into_response();
        assert_eq!(response.status().as_u16(), 500);
    }
}
