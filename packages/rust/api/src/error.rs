//! HTTP mapping of request and dispatch failures.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use leadscope_shared::LeadScopeError;

/// Error returned by handlers; rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// The body could not be decoded (status chosen by the extractor).
    Body(StatusCode, String),
    /// The body decoded but failed validation.
    Validation(String),
    /// Anything else; details are logged, not returned.
    Internal(LeadScopeError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection.status(), rejection.body_text())
    }
}

impl From<LeadScopeError> for ApiError {
    fn from(err: LeadScopeError) -> Self {
        match err {
            LeadScopeError::Validation { message } => Self::Validation(message),
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Body(status, detail) => (status, detail),
            Self::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            Self::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process registration".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_message() {
        let err = ApiError::from(LeadScopeError::validation("first_name must not be empty"));
        assert!(matches!(err, ApiError::Validation(ref m) if m == "first_name must not be empty"));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn other_errors_become_500() {
        let err = ApiError::from(LeadScopeError::Dispatch("no tokio runtime".into()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
