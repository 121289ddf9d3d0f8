//! Axum route handlers for fit analysis and interview preparation.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::export::{export_filename, render_report};
use crate::analysis::interview::{basic_questions, render_guide, QuestionSource};
use crate::capture::capture_selection;
use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::models::analysis::{AnalysisRecord, InterviewQuestions};
use crate::models::job::JobPosting;
use crate::state::AppState;
use crate::storage::{API_KEY, LAST_ANALYSIS, RESUME_TEXT};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub posting: Option<JobPosting>,
    /// Raw pasted job text, used when no structured posting is available.
    #[serde(default)]
    pub job_text: Option<String>,
    /// Overrides the stored résumé for this request only.
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    pub posting: JobPosting,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default = "default_true")]
    pub allow_basic_fallback: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub questions: InterviewQuestions,
    pub source: QuestionSource,
    pub guide: String,
    pub filename: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Loads the stored API key and the résumé (request override first).
async fn prerequisites(
    state: &AppState,
    resume_override: Option<String>,
) -> Result<(String, String), AppError> {
    let api_key = state
        .store
        .get::<String>(API_KEY)
        .await?
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Please add your Gemini API key first.".to_string()))?;

    let resume = match resume_override.filter(|r| !r.trim().is_empty()) {
        Some(r) => Some(r),
        None => state.store.get::<String>(RESUME_TEXT).await?,
    }
    .filter(|r| !r.trim().is_empty())
    .ok_or_else(|| AppError::Validation("Please add your resume/profile first.".to_string()))?;

    Ok((api_key, resume))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Scores the résumé against a posting and caches the result as the last
/// analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let (api_key, resume) = prerequisites(&state, request.resume).await?;

    let posting = match (request.posting, request.job_text) {
        (Some(posting), _) => posting,
        (None, Some(text)) => capture_selection(
            &text,
            "",
            &state.extractor.config().job_id_param,
            state.extractor.config().description_cap,
            Utc::now(),
        )?,
        (None, None) => {
            return Err(AppError::Validation(
                "Provide a job posting or job_text to analyze".to_string(),
            ))
        }
    };
    if posting.is_blank() {
        return Err(AppError::Validation(
            "No job details found to analyze".to_string(),
        ));
    }

    let analysis = state.analyzer.analyze_fit(&api_key, &posting, &resume).await?;
    let record = AnalysisRecord {
        id: Uuid::new_v4(),
        posting,
        analysis,
        created_at: Utc::now(),
    };
    state.store.set(LAST_ANALYSIS, &record).await?;

    info!(
        id = %record.id,
        fit_score = record.analysis.fit_score,
        "Fit analysis stored"
    );
    Ok(Json(record))
}

/// GET /api/v1/analysis/last
pub async fn handle_get_last(State(state): State<AppState>) -> Result<Json<AnalysisRecord>, AppError> {
    state
        .store
        .get::<AnalysisRecord>(LAST_ANALYSIS)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No analysis results to save".to_string()))
}

/// GET /api/v1/analysis/last/export
///
/// The cached analysis as a plain-text attachment.
pub async fn handle_export_last(State(state): State<AppState>) -> Result<Response, AppError> {
    let record = state
        .store
        .get::<AnalysisRecord>(LAST_ANALYSIS)
        .await?
        .ok_or_else(|| AppError::NotFound("No analysis results to save".to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", export_filename(&record));
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, render_report(&record)).into_response())
}

/// POST /api/v1/interview-questions
///
/// Asks the LLM for tailored questions. When the quota is exhausted and the
/// caller allows it, falls back to questions built from the posting alone.
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    let (api_key, resume) = prerequisites(&state, request.resume).await?;
    let posting = request.posting;

    let (questions, source) = match state
        .analyzer
        .interview_questions(&api_key, &posting, &resume)
        .await
    {
        Ok(q) => (q, QuestionSource::Ai),
        Err(LlmError::QuotaExceeded(msg)) if request.allow_basic_fallback => {
            warn!("Quota exceeded ({msg}); generating basic interview questions");
            (basic_questions(&posting), QuestionSource::Basic)
        }
        Err(e) => return Err(e.into()),
    };

    let guide = render_guide(&questions, &posting, source, Utc::now().date_naive());
    info!(
        total = questions.total(),
        source = ?source,
        "Interview questions ready"
    );

    Ok(Json(InterviewResponse {
        questions,
        source,
        guide: guide.content,
        filename: guide.filename,
    }))
}
