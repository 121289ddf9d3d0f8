use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Application configuration loaded from environment variables.
/// Nothing is required: every variable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON file backing the key-value store.
    pub store_path: PathBuf,
    /// Optional JSON file overriding the extractor's selectors and vocabularies.
    pub extractor_config: Option<PathBuf>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    /// When non-empty, extraction is limited to these hosts and their subdomains.
    pub allowed_hosts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            store_path: PathBuf::from("jobgenie-store.json"),
            extractor_config: None,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            allowed_hosts: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: match optional_env("PORT") {
                Some(p) => p.parse::<u16>().context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            store_path: optional_env("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            extractor_config: optional_env("EXTRACTOR_CONFIG").map(PathBuf::from),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_api_url),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            allowed_hosts: optional_env("EXTRACT_ALLOWED_HOSTS")
                .map(|raw| parse_host_list(&raw))
                .unwrap_or_default(),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().trim_start_matches('.').to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}
