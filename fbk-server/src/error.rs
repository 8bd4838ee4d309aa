//! Error types for fbk-server
//!
//! Maps the pipeline failure taxonomy onto the HTTP surface. Provider and
//! storage detail is logged server-side; clients only see the generic
//! messages below.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::completion::CompletionError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rating missing, non-numeric, fractional, or out of range (400)
    #[error("Invalid rating")]
    InvalidRating,

    /// Local per-IP submission quota exceeded (429)
    #[error("Submission quota exceeded")]
    RateLimited,

    /// AI provider throttled the request (429)
    #[error("Completion provider rate limited")]
    UpstreamBusy,

    /// AI provider billing quota exhausted (402)
    #[error("Completion provider quota exhausted")]
    QuotaExceeded,

    /// Unexpected provider failure (500)
    #[error("Processing error: {0}")]
    Processing(String),

    /// Persistence failure (500)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<fbk_common::Error> for ApiError {
    fn from(err: fbk_common::Error) -> Self {
        match err {
            fbk_common::Error::Database(e) => ApiError::Storage(e.to_string()),
            other => ApiError::Processing(other.to_string()),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::RateLimited => ApiError::UpstreamBusy,
            CompletionError::QuotaExceeded => ApiError::QuotaExceeded,
            other => ApiError::Processing(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRating => (
                StatusCode::BAD_REQUEST,
                "Invalid rating. Must be a number between 1 and 5.",
            ),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many submissions from this IP. Try again later.",
            ),
            ApiError::UpstreamBusy => (
                StatusCode::TOO_MANY_REQUESTS,
                "Service is temporarily busy. Please try again in a moment.",
            ),
            ApiError::QuotaExceeded => (
                StatusCode::PAYMENT_REQUIRED,
                "AI service quota exceeded. Please contact the administrator.",
            ),
            ApiError::Processing(ref detail) => {
                tracing::error!(detail = %detail, "Submission failed during completion generation");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred processing your review. Please try again.",
                )
            }
            ApiError::Storage(ref detail) => {
                tracing::error!(detail = %detail, "Submission failed during persistence");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred processing your review. Please try again.",
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(ApiError::InvalidRating), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_of(ApiError::UpstreamBusy), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_of(ApiError::QuotaExceeded), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            status_of(ApiError::Processing("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::Storage("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_common_error_mapping() {
        assert!(matches!(
            ApiError::from(fbk_common::Error::Database(sqlx::Error::RowNotFound)),
            ApiError::Storage(_)
        ));
        assert!(matches!(
            ApiError::from(fbk_common::Error::Internal("parse".into())),
            ApiError::Processing(_)
        ));
    }

    #[test]
    fn test_completion_error_mapping() {
        assert!(matches!(
            ApiError::from(CompletionError::RateLimited),
            ApiError::UpstreamBusy
        ));
        assert!(matches!(
            ApiError::from(CompletionError::QuotaExceeded),
            ApiError::QuotaExceeded
        ));
        assert!(matches!(
            ApiError::from(CompletionError::Api(503, "unavailable".into())),
            ApiError::Processing(_)
        ));
        assert!(matches!(
            ApiError::from(CompletionError::Network("timeout".into())),
            ApiError::Processing(_)
        ));
    }
}
