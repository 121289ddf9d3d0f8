mod analysis;
mod capture;
mod config;
mod errors;
mod extractor;
mod llm_client;
mod models;
mod portals;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::LlmAnalyzer;
use crate::config::Config;
use crate::extractor::config::ExtractorConfig;
use crate::extractor::Extractor;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::Store;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Genie API v{}", env!("CARGO_PKG_VERSION"));

    // Extractor vocabulary: built-in defaults unless a file overrides them
    let extractor_config = match &config.extractor_config {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::default(),
    };
    let extractor = Extractor::new(extractor_config).context("invalid extractor configuration")?;
    info!(
        "Extractor ready ({} role terms, {} company terms)",
        extractor.config().role_vocabulary.len(),
        extractor.config().company_vocabulary.len()
    );

    let store = Store::open(&config.store_path)
        .await
        .with_context(|| format!("failed to open store at {}", config.store_path.display()))?;

    let llm = LlmClient::new(config.gemini_api_url.clone(), config.gemini_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        config: config.clone(),
        store,
        extractor: Arc::new(extractor),
        analyzer: Arc::new(LlmAnalyzer(llm)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
