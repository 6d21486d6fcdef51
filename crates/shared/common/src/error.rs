//! Unified error handling for the HTTP surface.
//!
//! Provides a single error type that converts into an Axum response with a
//! stable `{"error": {"code", "message"}}` body. Internal details are logged
//! and never returned to the client.

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Seconds a client should wait before retrying a transient store failure.
pub const STORE_RETRY_AFTER_SECONDS: u64 = 5;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Transient: the credential store could not be reached in time
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::StoreUnavailable(_) => "SERVICE_UNAVAILABLE",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "UNAUTHORIZED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(msg) => format!("{} already exists", msg),

            // Hide details for internal/security errors
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::debug!("JWT rejected: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::StoreUnavailable(reason) => {
                tracing::warn!("Credential store unavailable: {}", reason);
                "Service temporarily unavailable, please retry".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = self.is_retryable();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if retryable {
            response.headers_mut().insert(
                RETRY_AFTER,
                HeaderValue::from(STORE_RETRY_AFTER_SECONDS),
            );
        }
        response
    }
}

// =============================================================================
// Store Error Conversion (SeaORM)
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return AppError::conflict("Customer");
        }
        AppError::StoreUnavailable(err.to_string())
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        AppError::StoreUnavailable(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let err = AppError::InvalidCredentials;
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "INVALID_CREDENTIALS");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_store_unavailable_is_retryable() {
        let response = AppError::store_unavailable("timeout").into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get(RETRY_AFTER).unwrap(),
            &STORE_RETRY_AFTER_SECONDS.to_string()
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = AppError::internal("db password is hunter2").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn test_domain_error_mapping() {
        assert!(matches!(
            AppError::from(DomainError::password("too short")),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::validation("bad email")),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::internal("hash failed")),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_forbidden_is_403() {
        let err = AppError::Forbidden;
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<u8> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
    }
}
