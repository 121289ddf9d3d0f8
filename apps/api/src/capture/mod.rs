//! Selection Capture: turning highlighted page text into a posting, and
//! recognising pages that probably hold a job description.

pub mod handlers;

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::extractor::page::{char_len, collapse_whitespace, truncate_chars};
use crate::models::job::JobPosting;

/// Selections at or under this many chars are treated as accidental.
pub const MIN_SELECTION_CHARS: usize = 20;

const JOB_PHRASES: &[&str] = &[
    "job description",
    "responsibilities",
    "requirements",
    "qualifications",
    "experience required",
    "skills required",
    "job summary",
    "role summary",
    "position summary",
    "what you'll do",
    "what we're looking for",
    "minimum qualifications",
    "preferred qualifications",
];

const JOB_BOARDS: &[&str] = &[
    "indeed",
    "linkedin",
    "glassdoor",
    "monster",
    "ziprecruiter",
    "careerbuilder",
];

/// Builds a description-only posting from a user selection.
pub fn capture_selection(
    text: &str,
    url: &str,
    job_id_param: &str,
    description_cap: usize,
    captured_at: DateTime<Utc>,
) -> Result<JobPosting, AppError> {
    let text = text.trim();
    if char_len(text) <= MIN_SELECTION_CHARS {
        return Err(AppError::Validation(
            "Please select some text first (job description).".to_string(),
        ));
    }

    let mut posting = JobPosting::empty(url, job_id_param, captured_at);
    let collapsed = collapse_whitespace(text);
    posting.description = truncate_chars(&collapsed, description_cap).trim_end().to_string();
    Ok(posting)
}

pub fn looks_like_job_page(text: &str, host: &str) -> bool {
    let text = text.to_lowercase();
    let host = host.to_lowercase();
    JOB_PHRASES.iter().any(|p| text.contains(p)) || JOB_BOARDS.iter().any(|b| host.contains(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_selection_rejected() {
        let err = capture_selection("   too short   ", "", "currentJobId", 2000, Utc::now());
        assert!(matches!(err, Err(AppError::Validation(_))));
        // exactly 20 chars is still too short
        let twenty = "a".repeat(20);
        assert!(capture_selection(&twenty, "", "currentJobId", 2000, Utc::now()).is_err());
    }

    #[test]
    fn test_selection_becomes_description() {
        let at = Utc::now();
        let posting = capture_selection(
            "  We are hiring a Rust engineer\n\n to build   services.  ",
            "https://www.linkedin.com/jobs/view/?currentJobId=42",
            "currentJobId",
            2000,
            at,
        )
        .unwrap();
        assert_eq!(posting.description, "We are hiring a Rust engineer to build services.");
        assert_eq!(posting.job_id, "42");
        assert!(posting.title.is_empty());
        assert!(posting.company.is_empty());
        assert_eq!(posting.extracted_at, at);
    }

    #[test]
    fn test_selection_is_capped() {
        let text = "word ".repeat(1000);
        let posting = capture_selection(&text, "", "currentJobId", 2000, Utc::now()).unwrap();
        let description = &posting.description;
        assert_eq!(description, description.trim());
        assert!(char_len(description) <= 2000);
        assert!(char_len(description) >= 1995);
    }

    #[test]
    fn test_job_page_detection() {
        assert!(looks_like_job_page("", "www.linkedin.com"));
        assert!(looks_like_job_page("Key Responsibilities include...", "example.com"));
        assert!(looks_like_job_page("What you'll do here", "example.com"));
        assert!(!looks_like_job_page("Recipes for dinner", "example.com"));
    }
}
