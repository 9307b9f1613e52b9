mod analysis;
mod config;
mod errors;
mod extraction;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::catalog::KeywordCatalog;
use crate::analysis::matcher::MatchEngine;
use crate::analysis::phrases::{ChunkPhraseExtractor, PhraseExtractor};
use crate::analysis::ranker::FieldRanker;
use crate::analysis::recommender::Recommender;
use crate::analysis::report::ReportAssembler;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillSync API v{}", env!("CARGO_PKG_VERSION"));

    let analyzer = build_analyzer(&config)?;
    let state = AppState {
        analyzer: Arc::new(analyzer),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the catalog and recommendation table and compiles the matcher.
/// Runs once before the first request; the result lives for the whole process.
fn build_analyzer(config: &Config) -> Result<ReportAssembler> {
    let catalog = KeywordCatalog::load(config.catalog_path.as_deref())
        .context("Failed to load keyword catalog")?;
    let catalog = Arc::new(catalog);

    let recommender = Recommender::load(config.recommendations_path.as_deref())
        .context("Failed to load recommendation table")?;
    let uncovered = recommender.uncovered_fields(&catalog);
    if !uncovered.is_empty() {
        warn!("No recommendations for fields: {}", uncovered.join(", "));
    }

    let engine = MatchEngine::new(Arc::clone(&catalog), config.match_policy)
        .context("Failed to compile keyword matcher")?;
    info!(
        "Keyword catalog v{}: {} fields, {} keywords, policy {}",
        catalog.version(),
        catalog.len(),
        engine.keyword_count(),
        engine.policy()
    );

    let ranker = if config.fallback_phrases {
        let extractor: Arc<dyn PhraseExtractor> =
            Arc::new(ChunkPhraseExtractor::new(config.fallback_limit));
        info!("Fallback phrase extraction enabled (limit {})", config.fallback_limit);
        FieldRanker::new(Some(extractor))
    } else {
        FieldRanker::without_fallback()
    };

    Ok(ReportAssembler::new(engine, ranker, recommender))
}
