//! Axum route handlers for highlighted-text capture.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::capture::capture_selection;
use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::state::AppState;
use crate::storage::SELECTED_TEXT;

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub text: String,
    #[serde(default)]
    pub url: String,
}

/// POST /api/v1/selection
pub async fn handle_post_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let config = state.extractor.config();
    let posting = capture_selection(
        &request.text,
        &request.url,
        &config.job_id_param,
        config.description_cap,
        Utc::now(),
    )?;
    state.store.set(SELECTED_TEXT, &posting).await?;

    info!("Selection captured ({} chars)", posting.description.chars().count());
    Ok((StatusCode::CREATED, Json(posting)))
}

/// GET /api/v1/selection
///
/// Hands out the pending selection once; the second read returns `null`.
pub async fn handle_take_selection(
    State(state): State<AppState>,
) -> Result<Json<Option<JobPosting>>, AppError> {
    Ok(Json(state.store.take::<JobPosting>(SELECTED_TEXT).await?))
}
