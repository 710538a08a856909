mod config;
mod eligibility;
mod errors;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::eligibility::cache::{InMemoryScoreCache, RedisScoreCache, ScoreCache};
use crate::eligibility::engine::EligibilityEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    let engine = Arc::new(EligibilityEngine::new(config.skill_match_mode));
    info!(
        "Eligibility engine initialized (weights: {:?}, skill matching: {:?})",
        engine.weights(),
        config.skill_match_mode
    );

    let score_cache = build_score_cache(&config).await?;

    let state = AppState {
        config: config.clone(),
        engine,
        score_cache,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the placement UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis-backed cache when REDIS_URL is set, in-process otherwise.
async fn build_score_cache(config: &Config) -> Result<Arc<dyn ScoreCache>> {
    let retention = config.score_retention();
    match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            let cache = RedisScoreCache::connect(client, retention).await?;
            info!(
                "Score cache: Redis (ttl {}h, retention {}h)",
                config.score_cache_ttl_hours, config.score_retention_hours
            );
            Ok(Arc::new(cache))
        }
        None => {
            info!(
                "Score cache: in-memory (ttl {}h, retention {}h)",
                config.score_cache_ttl_hours, config.score_retention_hours
            );
            Ok(Arc::new(InMemoryScoreCache::new(retention)))
        }
    }
}
