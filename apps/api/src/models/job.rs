use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A job posting as extracted from a page or captured from a user selection.
///
/// Empty strings mean "not found". Every string field is trimmed, and
/// `title`, `company` and `description` have already passed their length
/// bounds by the time a `JobPosting` is handed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub job_id: String,
    pub extracted_at: DateTime<Utc>,
}

impl JobPosting {
    /// A record with every field empty except `url` (and the job id, when the
    /// URL carries one).
    pub fn empty(url: &str, job_id_param: &str, extracted_at: DateTime<Utc>) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            description: String::new(),
            url: url.trim().to_string(),
            job_id: job_id_from_url(url, job_id_param),
            extracted_at,
        }
    }

    /// Names of the fields that came back empty, for retry guidance.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push("title");
        }
        if self.company.is_empty() {
            missing.push("company");
        }
        if self.description.is_empty() {
            missing.push("description");
        }
        missing
    }

    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.company.is_empty() && self.description.is_empty()
    }
}

/// Reads the site-specific posting identifier from the URL query string.
pub fn job_id_from_url(url: &str, param: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == param)
                .map(|(_, v)| v.trim().to_string())
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_from_linkedin_search_url() {
        let url = "https://www.linkedin.com/jobs/search/?currentJobId=3912345678&keywords=rust";
        assert_eq!(job_id_from_url(url, "currentJobId"), "3912345678");
    }

    #[test]
    fn test_job_id_absent_is_empty() {
        assert_eq!(
            job_id_from_url("https://www.linkedin.com/jobs/", "currentJobId"),
            ""
        );
        assert_eq!(job_id_from_url("not a url", "currentJobId"), "");
    }

    #[test]
    fn test_empty_posting_keeps_url_and_reports_all_missing() {
        let posting = JobPosting::empty(
            " https://example.com/jobs?currentJobId=42 ",
            "currentJobId",
            Utc::now(),
        );
        assert_eq!(posting.url, "https://example.com/jobs?currentJobId=42");
        assert_eq!(posting.job_id, "42");
        assert!(posting.is_blank());
        assert_eq!(posting.missing_fields(), vec!["title", "company", "description"]);
    }
}
