use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::extractor::Extractor;
use crate::storage::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub extractor: Arc<Extractor>,
    /// Pluggable analysis backend. Default: `LlmAnalyzer` over Gemini.
    pub analyzer: Arc<dyn Analyzer>,
}
