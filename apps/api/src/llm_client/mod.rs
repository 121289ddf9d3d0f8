/// LLM Client: the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module.
///
/// The API key is the user's own and is passed per call; it is never logged.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("API key is invalid or has no access: {0}")]
    InvalidApiKey(String),

    #[error("API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("API endpoint not found: {0}")]
    EndpointNotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No JSON object found in LLM response")]
    NoJson,

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sampling parameters sent as `generationConfig`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    pub const ANALYSIS: GenerationConfig = GenerationConfig {
        temperature: 0.7,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 2048,
    };

    pub const INTERVIEW: GenerationConfig = GenerationConfig {
        temperature: 0.8,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 3000,
    };
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub text: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate. Older response shapes put it directly on
    /// the candidate as `text` or `output`.
    pub fn text(&self) -> Option<&str> {
        let candidate = self.candidates.first()?;
        let usable = |t: &&str| !t.trim().is_empty();
        candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .filter(usable)
            .or_else(|| candidate.text.as_deref().filter(usable))
            .or_else(|| candidate.output.as_deref().filter(usable))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single LLM client used by all services.
/// Wraps the Gemini `generateContent` API with retry logic and JSON helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(120)).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Makes a raw call and returns the generated text.
    /// Retries on 5xx and transport errors with exponential backoff. A 429 is
    /// a quota problem and is returned at once so callers can fall back.
    pub async fn call(
        &self,
        api_key: &str,
        prompt: &str,
        generation: GenerationConfig,
    ) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: generation,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.endpoint())
                .query(&[("key", api_key)])
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(match status {
                    StatusCode::FORBIDDEN => LlmError::InvalidApiKey(message),
                    StatusCode::TOO_MANY_REQUESTS => LlmError::QuotaExceeded(message),
                    StatusCode::NOT_FOUND => LlmError::EndpointNotFound(message),
                    _ => LlmError::Api {
                        status: status.as_u16(),
                        message,
                    },
                });
            }

            let generated: GenerateResponse = response.json().await?;
            let text = generated.text().ok_or(LlmError::EmptyContent)?;

            debug!(
                model = %self.model,
                chars = text.len(),
                "LLM call succeeded"
            );

            return Ok(text.to_string());
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }

    /// Calls the LLM and deserializes the JSON object embedded in its reply.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        api_key: &str,
        prompt: &str,
        generation: GenerationConfig,
    ) -> Result<T, LlmError> {
        let text = self.call(api_key, prompt, generation).await?;
        parse_json_payload(&text)
    }
}

/// First balanced `{...}` block in `text`, aware of JSON strings and escapes.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Span from the first `{` to the last `}`.
fn greedy_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses the JSON object embedded in free text: the balanced block first,
/// then the greedy span if the balanced one does not parse.
pub fn parse_json_payload<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let balanced = extract_json_block(text);
    let greedy = greedy_json_span(text);

    let mut last_err = None;
    for candidate in [balanced, greedy].into_iter().flatten() {
        match serde_json::from_str::<T>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => last_err = Some(e),
        }
    }

    match last_err {
        Some(e) => Err(LlmError::Parse(e)),
        None => Err(LlmError::NoJson),
    }
}
