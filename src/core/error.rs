//! Error types and handling for the gateway.
//!
//! This module provides a unified error type [`AppError`] covering the
//! gateway's error taxonomy and its conversion into `{error, message?}` JSON
//! responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::config::FREE_DAILY_LIMIT;

/// Client-facing message for every provider failure.
pub const GENERATION_FAILED_MESSAGE: &str = "AI generation failed, please try again later";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"error": "Rate limit exceeded", "message": "Free plan is limited to 50 requests per day, please upgrade to Pro"}))]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// Why a request failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No access key was supplied
    Missing,
    /// The supplied access key is not registered
    Invalid,
}

impl AuthError {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Missing => "API key required",
            Self::Invalid => "Invalid API key",
        }
    }
}

/// Main error type for the application.
///
/// Handlers return this type; it never propagates past the handler boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or unknown access key
    #[error("Unauthorized: {}", .0.message())]
    Unauthorized(AuthError),

    /// Daily quota exhausted or burst limit hit
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Client omitted a required field or sent a malformed body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any failure talking to the completion provider.
    ///
    /// The underlying cause is logged where it happens.
    #[error("Generation failed")]
    Generation,

    /// Generic internal server errors with custom message
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Quota rejection for a free-plan account.
    pub fn daily_quota_exhausted() -> Self {
        AppError::RateLimitExceeded(format!(
            "Free plan is limited to {} requests per day, please upgrade to Pro",
            FREE_DAILY_LIMIT
        ))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generation | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Unauthorized(reason) => ErrorBody::new(reason.message()),
            AppError::RateLimitExceeded(message) => ErrorBody {
                error: "Rate limit exceeded".to_string(),
                message: Some(message),
            },
            AppError::BadRequest(message) => ErrorBody::new(message),
            AppError::Generation => ErrorBody::new(GENERATION_FAILED_MESSAGE),
            AppError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                ErrorBody::new("Internal server error")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Unauthorized(AuthError::Missing);
        assert_eq!(err.to_string(), "Unauthorized: API key required");

        let err = AppError::Internal("test error".to_string());
        assert_eq!(err.to_string(), "Internal server error: test error");

        let err = AppError::Generation;
        assert_eq!(err.to_string(), "Generation failed");
    }

    #[tokio::test]
    async fn test_missing_key_response() {
        let response = AppError::Unauthorized(AuthError::Missing).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "API key required");
    }

    #[tokio::test]
    async fn test_invalid_key_response() {
        let response = AppError::Unauthorized(AuthError::Invalid).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid API key");
    }

    #[tokio::test]
    async fn test_rate_limit_response_carries_message() {
        let response = AppError::daily_quota_exhausted().into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Rate limit exceeded");
        assert!(json["message"].as_str().unwrap().contains("50 requests per day"));
    }

    #[tokio::test]
    async fn test_bad_request_response() {
        let response = AppError::BadRequest("Message required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json, json!({ "error": "Message required" }));
    }

    #[tokio::test]
    async fn test_generation_response_is_generic() {
        let response = AppError::Generation.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_response_hides_detail() {
        let response = AppError::Internal("lock poisoned at 0xdead".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(!json.to_string().contains("0xdead"));
    }

    #[tokio::test]
    async fn test_result_type_alias_error() {
        fn returns_error() -> Result<String> {
            Err(AppError::Unauthorized(AuthError::Invalid))
        }

        assert!(returns_error().is_err());
    }
}
