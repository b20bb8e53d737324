use std::sync::Arc;

use sqlx::PgPool;

use crate::extract::page::PageRenderer;
use crate::jobs::search::JobSearchClient;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Pluggable rendering engine for job-page scraping. Default: HttpRenderer.
    pub renderer: Arc<dyn PageRenderer>,
    pub jobs: JobSearchClient,
}
