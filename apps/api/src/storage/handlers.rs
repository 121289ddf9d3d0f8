//! Axum route handlers for stored user settings (API key, résumé).

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::{API_KEY, RESUME_TEXT};

#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SettingsStatus {
    pub has_api_key: bool,
    pub has_resume: bool,
}

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<SettingsStatus> {
    Json(SettingsStatus {
        has_api_key: state.store.contains(API_KEY).await,
        has_resume: state.store.contains(RESUME_TEXT).await,
    })
}

/// PUT /api/v1/settings/api-key
pub async fn handle_put_api_key(
    State(state): State<AppState>,
    Json(request): Json<ApiKeyRequest>,
) -> Result<StatusCode, AppError> {
    let api_key = request.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation(
            "Please enter a valid API key".to_string(),
        ));
    }
    state.store.set(API_KEY, &api_key).await?;
    info!("API key saved");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/settings/api-key
pub async fn handle_delete_api_key(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.remove(API_KEY).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/settings/resume
pub async fn handle_put_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<StatusCode, AppError> {
    let resume = request.resume_text.trim();
    if resume.is_empty() {
        return Err(AppError::Validation(
            "Please enter your resume content".to_string(),
        ));
    }
    state.store.set(RESUME_TEXT, &resume).await?;
    info!("Resume saved ({} chars)", resume.chars().count());
    Ok(StatusCode::NO_CONTENT)
}
