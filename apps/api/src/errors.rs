use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::storage::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The target page cannot be read (restricted scheme or unsupported
    /// site). Distinct from a failed extraction, which is never an error.
    #[error("Page access denied: {0}")]
    PageAccessDenied(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PageAccessDenied(msg) => {
                (StatusCode::FORBIDDEN, "PAGE_ACCESS_DENIED", msg.clone())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                match e {
                    LlmError::QuotaExceeded(_) => (
                        StatusCode::TOO_MANY_REQUESTS,
                        "LLM_QUOTA_EXCEEDED",
                        "API quota exceeded. Please try again later.".to_string(),
                    ),
                    LlmError::InvalidApiKey(_) => (
                        StatusCode::UNAUTHORIZED,
                        "LLM_INVALID_API_KEY",
                        "API key is invalid or has no access. Please check your Gemini API key."
                            .to_string(),
                    ),
                    LlmError::NoJson | LlmError::Parse(_) => (
                        StatusCode::BAD_GATEWAY,
                        "LLM_BAD_RESPONSE",
                        "The AI response could not be parsed. Please try again.".to_string(),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "LLM_ERROR",
                        "An AI processing error occurred".to_string(),
                    ),
                }
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_access_denied_is_forbidden() {
        let response = AppError::PageAccessDenied("chrome://settings".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_quota_maps_to_429() {
        let response = AppError::Llm(LlmError::QuotaExceeded("slow down".into())).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
