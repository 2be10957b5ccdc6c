/**
 * API Error Types
 *
 * This module defines the error enum shared by all HTTP handlers.
 * Each variant maps to one HTTP status code; the taxonomy mirrors the
 * platform's failure modes: input validation, authorization, conflicts,
 * upstream AI gateway failures, and database errors.
 *
 * Domain and authorization failures are never retried by callers;
 * rate-limit errors are surfaced as "try again shortly" rather than
 * auto-retried against an already-saturated gateway.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Errors returned by API handlers
///
/// Every failure path in the backend produces one of these variants,
/// which is then rendered as a JSON body by the `IntoResponse`
/// implementation in `conversion.rs`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed validation (empty, over-length, malformed shape).
    /// Rejected before any persistence or network call.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials
    #[error("احراز هویت مورد نیاز است")]
    Unauthorized,

    /// Authenticated but not allowed to perform the action
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness conflict, surfaced with a friendly message instead of
    /// a raw constraint-violation string
    #[error("{0}")]
    Conflict(String),

    /// Upstream AI gateway returned 429
    #[error("محدودیت تعداد درخواست. لطفا کمی صبر کنید.")]
    RateLimited,

    /// Upstream AI gateway returned 402
    #[error("اعتبار شما تمام شده است.")]
    QuotaExhausted,

    /// Upstream AI gateway failed in some other way
    #[error("خطا در ارتباط با سرویس هوش مصنوعی")]
    Upstream(String),

    /// Database unavailable (DATABASE_URL not configured)
    #[error("Database not configured")]
    DatabaseUnavailable,

    /// Database query failed
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// Anything else; caught at the outermost boundary
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing error message
    ///
    /// Database and internal variants deliberately return a generic
    /// message; the underlying cause is logged, not leaked.
    pub fn message(&self) -> String {
        match self {
            Self::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "خطای داخلی سرور".to_string()
            }
            Self::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "خطای داخلی سرور".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Map a sqlx error to the API taxonomy, turning unique-constraint
    /// violations into a Conflict with the given message.
    pub fn from_db(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict_message.to_string());
            }
        }
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("empty").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::forbidden("not a member").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::conflict("already exists").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::QuotaExhausted.status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ApiError::Upstream("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = ApiError::Internal("secret detail".into());
        assert!(!err.message().contains("secret"));
    }

    #[test]
    fn test_validation_message_passthrough() {
        let err = ApiError::validation("پیام نمی‌تواند خالی باشد");
        assert_eq!(err.message(), "پیام نمی‌تواند خالی باشد");
    }

    #[test]
    fn test_from_db_non_unique_is_database() {
        let err = ApiError::from_db(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, ApiError::Database(_)));
    }
}
