use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::JobPosting;

/// Reasoning longer than this is shortened for display and export.
pub const REASONING_DISPLAY_LIMIT: usize = 400;
/// A sentence or word break is only used if it falls past this point.
const REASONING_MIN_CUT: usize = 300;

/// Fit analysis returned by the LLM, normalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFitAnalysis")]
pub struct FitAnalysis {
    pub fit_score: u32, // 0 – 100
    pub reasoning: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub interview_questions: Vec<String>,
}

/// Wire shape of the model's JSON. Older prompts used camelCase and
/// `match_percentage` / `resume_improvements`, so those names are accepted too.
#[derive(Debug, Deserialize)]
struct RawFitAnalysis {
    #[serde(alias = "fitScore", alias = "match_percentage")]
    fit_score: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    gaps: Vec<String>,
    #[serde(default, alias = "resume_improvements")]
    recommendations: Vec<String>,
    #[serde(default, alias = "interviewQuestions")]
    interview_questions: Vec<String>,
}

impl From<RawFitAnalysis> for FitAnalysis {
    fn from(raw: RawFitAnalysis) -> Self {
        let score = if raw.fit_score.is_finite() {
            raw.fit_score.round().clamp(0.0, 100.0) as u32
        } else {
            0
        };
        Self {
            fit_score: score,
            reasoning: raw.reasoning.trim().to_string(),
            strengths: clean_items(raw.strengths),
            gaps: clean_items(raw.gaps),
            recommendations: clean_items(raw.recommendations),
            interview_questions: clean_items(raw.interview_questions),
        }
    }
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Excellent
        } else if score >= 60 {
            ScoreBand::Good
        } else if score >= 40 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::Poor => "Poor",
        }
    }
}

impl FitAnalysis {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.fit_score)
    }

    /// Reasoning shortened to `limit` chars, preferring a sentence end, then
    /// a word break, past the 300th char.
    pub fn short_reasoning(&self, limit: usize) -> String {
        let chars: Vec<char> = self.reasoning.chars().collect();
        if chars.len() <= limit {
            return self.reasoning.clone();
        }

        let truncated = &chars[..limit];
        let last_period = truncated.iter().rposition(|&c| c == '.');
        let last_space = truncated.iter().rposition(|&c| c == ' ');

        match (last_period, last_space) {
            (Some(p), _) if p > REASONING_MIN_CUT => chars[..=p].iter().collect(),
            (_, Some(s)) if s > REASONING_MIN_CUT => {
                let mut out: String = chars[..s].iter().collect();
                out.push_str("...");
                out
            }
            _ => {
                let mut out: String = truncated.iter().collect();
                out.push_str("...");
                out
            }
        }
    }
}

/// Interview questions produced by the LLM or by the basic generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestions {
    #[serde(default, alias = "behavioralQuestions")]
    pub behavioral_questions: Vec<String>,
    #[serde(default, alias = "technicalQuestions")]
    pub technical_questions: Vec<String>,
}

impl InterviewQuestions {
    pub fn is_empty(&self) -> bool {
        self.behavioral_questions.is_empty() && self.technical_questions.is_empty()
    }

    pub fn total(&self) -> usize {
        self.behavioral_questions.len() + self.technical_questions.len()
    }
}

/// The most recent analysis, cached under `last_analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub posting: JobPosting,
    pub analysis: FitAnalysis,
    pub created_at: DateTime<Utc>,
}
