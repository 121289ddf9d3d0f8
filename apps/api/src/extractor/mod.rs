//! Field Extractor: turns a page snapshot into a `JobPosting`.
//!
//! Runs an ordered strategy chain per field (structured selectors, heuristic
//! visibility, identifier-scoped cards, keyword density, last-resort
//! allow-lists), then a single cleanup pass. Extraction never fails: a field
//! nothing could find comes back as an empty string.

pub mod cleanup;
pub mod config;
pub mod handlers;
pub mod page;
pub mod strategies;

use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::extractor::cleanup::{clean_company, clean_description, clean_title};
use crate::extractor::config::{ConfigError, ExtractorConfig};
use crate::extractor::page::{element_text, PageContext};
use crate::extractor::strategies::{Candidates, Ctx, Strategy};
use crate::models::job::{job_id_from_url, JobPosting};

/// Selectors compiled once from `ExtractorConfig`.
pub struct SelectorSet {
    pub main_content: Vec<Selector>,
    pub title: Vec<Selector>,
    pub company: Vec<Selector>,
    pub description: Vec<Selector>,
    pub visible_title: Selector,
    pub visible_company: Selector,
    pub card_title: Selector,
    pub card_company: Selector,
    pub description_blocks: Selector,
    pub last_resort_scope: Vec<Selector>,
    pub page_title: Selector,
    pub body: Selector,
}

fn compile(field: &'static str, raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|e| ConfigError::Selector {
        field,
        selector: raw.to_string(),
        reason: format!("{e:?}"),
    })
}

fn compile_all(field: &'static str, raw: &[String]) -> Result<Vec<Selector>, ConfigError> {
    raw.iter().map(|s| compile(field, s)).collect()
}

impl SelectorSet {
    fn compile(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            main_content: compile_all("main_content_selectors", &config.main_content_selectors)?,
            title: compile_all("title_selectors", &config.title_selectors)?,
            company: compile_all("company_selectors", &config.company_selectors)?,
            description: compile_all("description_selectors", &config.description_selectors)?,
            visible_title: compile("visible_title_tags", &config.visible_title_tags)?,
            visible_company: compile("visible_company_tags", &config.visible_company_tags)?,
            card_title: compile("card_title_selectors", &config.card_title_selectors)?,
            card_company: compile("card_company_selectors", &config.card_company_selectors)?,
            description_blocks: compile("description_block_tags", &config.description_block_tags)?,
            last_resort_scope: compile_all(
                "last_resort_scope_selectors",
                &config.last_resort_scope_selectors,
            )?,
            page_title: compile("page_title", "title")?,
            body: compile("body", "body")?,
        })
    }
}

/// A configured extractor. Holds no per-call state; share it freely.
pub struct Extractor {
    config: ExtractorConfig,
    selectors: SelectorSet,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let selectors = SelectorSet::compile(&config)?;
        Ok(Self { config, selectors })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts a posting from a snapshot. Read-only and deterministic for a
    /// fixed snapshot: `extracted_at` is the snapshot's capture time.
    pub fn extract(&self, page: &PageContext) -> JobPosting {
        let doc = Html::parse_document(&page.html);
        let job_id = job_id_from_url(&page.url, &self.config.job_id_param);

        let ctx = Ctx {
            doc: &doc,
            selectors: &self.selectors,
            config: &self.config,
            job_id: &job_id,
        };

        let mut found = Candidates::default();
        for strategy in Strategy::CHAIN {
            if found.is_complete() {
                break;
            }
            strategy.apply(&ctx, &mut found);
        }

        let posting = self.finish(found, page);

        info!(
            url = %posting.url,
            job_id = %posting.job_id,
            title = %posting.title,
            company = %posting.company,
            description_chars = posting.description.chars().count(),
            "extraction finished"
        );

        posting
    }

    /// Whitespace-collapsed text of the snapshot's `<body>`.
    pub fn body_text(&self, page: &PageContext) -> String {
        let doc = Html::parse_document(&page.html);
        doc.select(&self.selectors.body)
            .next()
            .map(|body| element_text(&body))
            .unwrap_or_default()
    }

    fn finish(&self, found: Candidates, page: &PageContext) -> JobPosting {
        let cfg = &self.config;
        let mut posting = JobPosting::empty(&page.url, &cfg.job_id_param, page.captured_at);

        if let Some(raw) = found.title {
            posting.title = clean_title(&raw, cfg.title_length);
            if posting.title.is_empty() {
                debug!(field = "title", raw = %raw, "validation rejected");
            }
        }
        if let Some(raw) = found.company {
            posting.company = clean_company(&raw, cfg.company_length);
            if posting.company.is_empty() {
                debug!(field = "company", raw = %raw, "validation rejected");
            }
        }
        if let Some(raw) = found.description {
            posting.description =
                clean_description(&raw, cfg.description_min_length, cfg.description_cap);
            if posting.description.is_empty() {
                debug!(field = "description", "validation rejected");
            }
        }

        posting
    }
}
