//! Extractor configuration: selector lists, vocabularies and thresholds.
//!
//! Everything the strategy chain matches against lives here so the chain's
//! control flow stays fixed while the vocabulary evolves. Defaults target
//! LinkedIn job pages; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read extractor config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid extractor config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid selector '{selector}' in {field}: {reason}")]
    Selector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("invalid extractor config: {0}")]
    Invalid(String),
}

/// Inclusive length bounds, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && len <= self.max
    }
}

/// Minimum on-screen placement for a heuristic candidate. Each bound is
/// exclusive: an element must be strictly further right, wider and taller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub min_left: f64,
    pub min_width: f64,
    #[serde(default)]
    pub min_height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    // strategy 1: structured selectors
    pub main_content_selectors: Vec<String>,
    pub title_selectors: Vec<String>,
    pub company_selectors: Vec<String>,
    pub description_selectors: Vec<String>,

    // strategy 2: heuristic visibility
    pub role_vocabulary: Vec<String>,
    pub company_vocabulary: Vec<String>,
    pub visible_title_tags: String,
    pub visible_company_tags: String,
    pub title_placement: Placement,
    pub company_placement: Placement,
    pub visible_title_length: LengthRange,
    pub visible_company_length: LengthRange,

    // strategy 3: identifier scoped
    pub job_id_param: String,
    pub job_id_attributes: Vec<String>,
    pub card_title_selectors: String,
    pub card_company_selectors: String,

    // strategy 4: keyword density
    pub description_block_tags: String,
    pub description_keywords: Vec<String>,
    pub description_min_keywords: usize,
    /// Half-open: `min <= len < max`.
    pub description_window: LengthRange,
    pub description_min_length: usize,
    pub description_cap: usize,

    // strategy 5: last resort allow-lists
    pub known_titles: Vec<String>,
    pub known_companies: Vec<String>,
    pub last_resort_scope_selectors: Vec<String>,

    // cleanup bounds
    pub title_length: LengthRange,
    pub company_length: LengthRange,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            main_content_selectors: strings(&[
                ".jobs-search__job-details",
                ".job-view-layout",
                ".artdeco-card",
            ]),
            title_selectors: strings(&[
                ".jobs-unified-top-card__job-title h1",
                ".job-details-jobs-unified-top-card__job-title h1",
                ".jobs-unified-top-card__job-title",
                "h1[data-test-id=\"job-title\"]",
                ".jobs-search__job-details h1",
                "h1",
            ]),
            company_selectors: strings(&[
                ".jobs-unified-top-card__company-name a",
                ".jobs-unified-top-card__company-name",
                ".job-details-jobs-unified-top-card__company-name a",
                ".job-details-jobs-unified-top-card__company-name",
                "a[data-test-id=\"job-poster-name\"]",
                ".jobs-search__job-details .jobs-unified-top-card__company-name",
            ]),
            description_selectors: strings(&[
                ".jobs-description-content__text",
                ".jobs-box__html-content",
                ".jobs-description__container",
                "[data-test-id=\"job-description\"]",
            ]),
            role_vocabulary: strings(&[
                "engineer",
                "developer",
                "scientist",
                "analyst",
                "manager",
                "lead",
                "designer",
                "architect",
                "consultant",
                "specialist",
                "administrator",
                "director",
                "intern",
            ]),
            company_vocabulary: strings(&[
                "Inc",
                "Ltd",
                "LLC",
                "Corp",
                "Corporation",
                "GmbH",
                "Technologies",
                "Solutions",
                "Labs",
            ]),
            visible_title_tags: "h1, h2, h3".to_string(),
            visible_company_tags: "a, span, div, p, h2, h3, h4".to_string(),
            title_placement: Placement {
                min_left: 300.0,
                min_width: 200.0,
                min_height: 0.0,
            },
            company_placement: Placement {
                min_left: 600.0,
                min_width: 50.0,
                min_height: 10.0,
            },
            visible_title_length: LengthRange::new(5, 100),
            visible_company_length: LengthRange::new(2, 49),
            job_id_param: "currentJobId".to_string(),
            job_id_attributes: strings(&["data-job-id", "data-occludable-job-id"]),
            card_title_selectors:
                "h3, [class*=\"job-card-list__title\"], a[data-test-id=\"job-title\"]".to_string(),
            card_company_selectors: "h4, [class*=\"job-card-list__company\"], [class*=\"company\"]"
                .to_string(),
            description_block_tags: "div, section, article, p".to_string(),
            description_keywords: strings(&[
                "experience",
                "skills",
                "requirements",
                "responsibilities",
                "qualifications",
                "role",
                "position",
                "team",
                "work",
                "develop",
                "manage",
            ]),
            description_min_keywords: 3,
            description_window: LengthRange::new(200, 10_000),
            description_min_length: 100,
            description_cap: 2000,
            known_titles: Vec::new(),
            known_companies: Vec::new(),
            last_resort_scope_selectors: strings(&["[role=\"main\"]", ".scaffold-layout__detail"]),
            title_length: LengthRange::new(5, 100),
            company_length: LengthRange::new(2, 50),
        }
    }
}

impl ExtractorConfig {
    /// Loads a config file. Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: ExtractorConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            ("visible_title_length", self.visible_title_length),
            ("visible_company_length", self.visible_company_length),
            ("description_window", self.description_window),
            ("title_length", self.title_length),
            ("company_length", self.company_length),
        ];
        for (name, range) in ranges {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        if self.description_cap < self.description_min_length {
            return Err(ConfigError::Invalid(format!(
                "description_cap {} is below description_min_length {}",
                self.description_cap, self.description_min_length
            )));
        }
        if self.description_min_keywords == 0 {
            return Err(ConfigError::Invalid(
                "description_min_keywords must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
