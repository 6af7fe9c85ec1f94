use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::extraction::ProfileExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Pluggable resume profile extractor. Default: LlmProfileExtractor over Gemini;
    /// tests swap in a mock.
    pub extractor: Arc<dyn ProfileExtractor>,
}
