pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::capture::handlers as capture;
use crate::extractor::handlers as extractor;
use crate::portals;
use crate::state::AppState;
use crate::storage::handlers as settings;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Field extraction + selection capture
        .route("/api/v1/extract", post(extractor::handle_extract))
        .route(
            "/api/v1/selection",
            post(capture::handle_post_selection).get(capture::handle_take_selection),
        )
        // Stored settings
        .route("/api/v1/settings", get(settings::handle_get_settings))
        .route(
            "/api/v1/settings/api-key",
            put(settings::handle_put_api_key).delete(settings::handle_delete_api_key),
        )
        .route("/api/v1/settings/resume", put(settings::handle_put_resume))
        // Analysis
        .route("/api/v1/analysis", post(analysis::handle_analyze))
        .route("/api/v1/analysis/last", get(analysis::handle_get_last))
        .route(
            "/api/v1/analysis/last/export",
            get(analysis::handle_export_last),
        )
        .route(
            "/api/v1/interview-questions",
            post(analysis::handle_interview_questions),
        )
        .route("/api/v1/search-links", get(portals::handle_search_links))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::Analyzer;
    use crate::config::Config;
    use crate::extractor::config::ExtractorConfig;
    use crate::extractor::Extractor;
    use crate::llm_client::LlmError;
    use crate::models::analysis::{FitAnalysis, InterviewQuestions};
    use crate::models::job::JobPosting;
    use crate::storage::Store;

    /// Canned analyzer: a fixed fit result, and an exhausted quota for
    /// interview questions.
    struct StubAnalyzer;

    #[async_trait]
    impl Analyzer for StubAnalyzer {
        async fn analyze_fit(
            &self,
            _api_key: &str,
            _posting: &JobPosting,
            _resume: &str,
        ) -> Result<FitAnalysis, LlmError> {
            Ok(FitAnalysis {
                fit_score: 72,
                reasoning: "Solid backend overlap.".to_string(),
                strengths: vec!["Rust".to_string()],
                gaps: vec!["Kubernetes".to_string()],
                recommendations: vec!["Mention on-call work".to_string()],
                interview_questions: vec!["Why Rust?".to_string()],
            })
        }

        async fn interview_questions(
            &self,
            _api_key: &str,
            _posting: &JobPosting,
            _resume: &str,
        ) -> Result<InterviewQuestions, LlmError> {
            Err(LlmError::QuotaExceeded("quota".to_string()))
        }
    }

    fn app() -> Router {
        let state = AppState {
            config: Config::default(),
            store: Store::in_memory(),
            extractor: Arc::new(Extractor::new(ExtractorConfig::default()).unwrap()),
            analyzer: Arc::new(StubAnalyzer),
        };
        build_router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn configure(app: &Router) {
        let (status, _) = send(
            app,
            Method::PUT,
            "/api/v1/settings/api-key",
            Some(json!({"api_key": "test-key"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(
            app,
            Method::PUT,
            "/api/v1/settings/resume",
            Some(json!({"resume_text": "Backend engineer, six years of Rust."})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    fn posting_json() -> Value {
        json!({
            "title": "Senior Backend Engineer",
            "company": "Acme Robotics",
            "description": "Build Rust services and APIs.",
            "url": "https://www.linkedin.com/jobs/view/1",
            "job_id": "",
            "extracted_at": "2026-01-05T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_extract_denies_browser_pages() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/extract",
            Some(json!({"url": "chrome://extensions", "html": "<html></html>"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "PAGE_ACCESS_DENIED");
    }

    #[tokio::test]
    async fn test_extract_reports_missing_fields() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/extract",
            Some(json!({
                "url": "https://www.linkedin.com/jobs/search/?currentJobId=77",
                "html": "<html><body><p>Nothing here</p></body></html>",
                "captured_at": "2026-01-05T10:00:00Z"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["posting"]["job_id"], "77");
        assert_eq!(body["posting"]["extracted_at"], "2026-01-05T10:00:00Z");
        assert_eq!(body["missing_fields"], json!(["title", "company", "description"]));
        assert_eq!(body["looks_like_job_page"], true);
    }

    #[tokio::test]
    async fn test_selection_is_taken_once() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/selection",
            Some(json!({"text": "Responsibilities: design and ship Rust services."})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["description"],
            "Responsibilities: design and ship Rust services."
        );

        let (_, first) = send(&app, Method::GET, "/api/v1/selection", None).await;
        assert_eq!(first["description"], body["description"]);
        let (status, second) = send(&app, Method::GET, "/api/v1/selection", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(second.is_null());
    }

    #[tokio::test]
    async fn test_short_selection_rejected() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/selection",
            Some(json!({"text": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please select some text first (job description)."
        );
    }

    #[tokio::test]
    async fn test_analysis_requires_api_key() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/analysis",
            Some(json!({"posting": posting_json()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Please add your Gemini API key first."));
    }

    #[tokio::test]
    async fn test_analysis_is_cached_and_exported() {
        let app = app();
        configure(&app).await;

        let (status, _) = send(&app, Method::GET, "/api/v1/analysis/last", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, record) = send(
            &app,
            Method::POST,
            "/api/v1/analysis",
            Some(json!({"job_text": "We need a backend engineer with Rust experience."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["analysis"]["fit_score"], 72);

        let (status, last) = send(&app, Method::GET, "/api/v1/analysis/last", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(last["id"], record["id"]);

        let request = Request::builder()
            .uri("/api/v1/analysis/last/export")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"jobgenie_analysis_"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("- Kubernetes"));
    }

    #[tokio::test]
    async fn test_interview_falls_back_on_quota() {
        let app = app();
        configure(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/interview-questions",
            Some(json!({"posting": posting_json()})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "basic");
        assert_eq!(body["questions"]["behavioral_questions"].as_array().unwrap().len(), 8);
        assert!(body["filename"]
            .as_str()
            .unwrap()
            .starts_with("Basic_Interview_Questions_Senior_Backend_Engineer_Acme_Robotics_"));
    }

    #[tokio::test]
    async fn test_interview_quota_without_fallback() {
        let app = app();
        configure(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/interview-questions",
            Some(json!({"posting": posting_json(), "allow_basic_fallback": false})),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "LLM_QUOTA_EXCEEDED");
    }

    #[tokio::test]
    async fn test_settings_status() {
        let app = app();
        let (_, before) = send(&app, Method::GET, "/api/v1/settings", None).await;
        assert_eq!(before, json!({"has_api_key": false, "has_resume": false}));

        configure(&app).await;
        let (_, after) = send(&app, Method::GET, "/api/v1/settings", None).await;
        assert_eq!(after, json!({"has_api_key": true, "has_resume": true}));

        let (status, _) = send(&app, Method::DELETE, "/api/v1/settings/api-key", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, cleared) = send(&app, Method::GET, "/api/v1/settings", None).await;
        assert_eq!(cleared["has_api_key"], false);
    }

    #[tokio::test]
    async fn test_search_links() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/v1/search-links?role=data%20analyst", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[1]["url"], "https://www.indeed.com/jobs?q=data+analyst");

        let (status, _) = send(&app, Method::GET, "/api/v1/search-links", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
