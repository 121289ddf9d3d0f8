//! Axum route handler for page-snapshot extraction.

use axum::{extract::State, Json};
use reqwest::Url;
use serde::Serialize;
use tracing::warn;

use crate::capture::looks_like_job_page;
use crate::errors::AppError;
use crate::extractor::page::PageContext;
use crate::models::job::JobPosting;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub posting: JobPosting,
    /// Fields that came back empty; the client may retry after the page
    /// finishes rendering.
    pub missing_fields: Vec<&'static str>,
    pub looks_like_job_page: bool,
}

/// Refuses snapshots the extractor must not read: non-web schemes, and hosts
/// outside `allowed_hosts` when that list is non-empty.
pub fn check_access(raw_url: &str, allowed_hosts: &[String]) -> Result<Url, AppError> {
    let url = Url::parse(raw_url.trim())
        .map_err(|e| AppError::Validation(format!("Invalid page URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::PageAccessDenied(format!(
            "Cannot read {}: pages. Please navigate to a supported job page.",
            url.scheme()
        )));
    }

    if !allowed_hosts.is_empty() {
        let host = url.host_str().unwrap_or_default().to_lowercase();
        let allowed = allowed_hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")));
        if !allowed {
            return Err(AppError::PageAccessDenied(format!(
                "{host} is not a supported site. Please navigate to a supported job page."
            )));
        }
    }

    Ok(url)
}

/// POST /api/v1/extract
///
/// Extraction itself never fails; empty fields are reported in
/// `missing_fields` instead.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(page): Json<PageContext>,
) -> Result<Json<ExtractResponse>, AppError> {
    let url = check_access(&page.url, &state.config.allowed_hosts)?;
    let host = url.host_str().unwrap_or_default();

    let posting = state.extractor.extract(&page);
    let page_text = state.extractor.body_text(&page);
    let missing_fields = posting.missing_fields();
    if !missing_fields.is_empty() {
        warn!(url = %posting.url, missing = ?missing_fields, "Extraction incomplete");
    }

    Ok(Json(ExtractResponse {
        looks_like_job_page: looks_like_job_page(&page_text, host),
        missing_fields,
        posting,
    }))
}
