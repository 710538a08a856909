use std::sync::Arc;

use crate::config::Config;
use crate::eligibility::cache::ScoreCache;
use crate::eligibility::engine::EligibilityEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stateless scorer; cloned `Arc`s are handed to blocking batch workers.
    pub engine: Arc<EligibilityEngine>,
    /// Pluggable result cache. Redis when REDIS_URL is set, otherwise in-process.
    pub score_cache: Arc<dyn ScoreCache>,
}
