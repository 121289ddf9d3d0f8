//! Analysis Client: fit scoring and interview preparation through the LLM.
//!
//! `AppState` holds an `Arc<dyn Analyzer>`; the default backend is
//! `LlmAnalyzer`, tests swap in a canned one.

pub mod export;
pub mod handlers;
pub mod interview;
pub mod prompts;

use async_trait::async_trait;
use tracing::info;

use crate::analysis::prompts::{FIT_PROMPT_TEMPLATE, INTERVIEW_PROMPT_TEMPLATE};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{GenerationConfig, LlmClient, LlmError};
use crate::models::analysis::{FitAnalysis, InterviewQuestions};
use crate::models::job::JobPosting;

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze_fit(
        &self,
        api_key: &str,
        posting: &JobPosting,
        resume: &str,
    ) -> Result<FitAnalysis, LlmError>;

    async fn interview_questions(
        &self,
        api_key: &str,
        posting: &JobPosting,
        resume: &str,
    ) -> Result<InterviewQuestions, LlmError>;
}

/// Fills a prompt template with the posting fields and résumé.
pub fn render_prompt(template: &str, posting: &JobPosting, resume: &str) -> String {
    let job_id = if posting.job_id.is_empty() {
        "N/A"
    } else {
        posting.job_id.as_str()
    };
    let mut body = String::with_capacity(template.len() + posting.description.len() + resume.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        body.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let value = match &tail[1..close] {
                "title" => posting.title.as_str(),
                "company" => posting.company.as_str(),
                "job_id" => job_id,
                "description" => posting.description.as_str(),
                "resume" => resume,
                _ => return None,
            };
            Some((value, close))
        });
        match value {
            Some((value, close)) => {
                body.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                body.push('{');
                rest = &tail[1..];
            }
        }
    }
    body.push_str(rest);
    format!("{body}\n\n{JSON_ONLY_INSTRUCTION}")
}

pub struct LlmAnalyzer(pub LlmClient);

#[async_trait]
impl Analyzer for LlmAnalyzer {
    async fn analyze_fit(
        &self,
        api_key: &str,
        posting: &JobPosting,
        resume: &str,
    ) -> Result<FitAnalysis, LlmError> {
        info!(title = %posting.title, company = %posting.company, "requesting fit analysis");
        let prompt = render_prompt(FIT_PROMPT_TEMPLATE, posting, resume);
        self.0
            .call_json::<FitAnalysis>(api_key, &prompt, GenerationConfig::ANALYSIS)
            .await
    }

    async fn interview_questions(
        &self,
        api_key: &str,
        posting: &JobPosting,
        resume: &str,
    ) -> Result<InterviewQuestions, LlmError> {
        info!(title = %posting.title, "requesting interview questions");
        let prompt = render_prompt(INTERVIEW_PROMPT_TEMPLATE, posting, resume);
        let questions = self
            .0
            .call_json::<InterviewQuestions>(api_key, &prompt, GenerationConfig::INTERVIEW)
            .await?;
        if questions.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(questions)
    }
}
