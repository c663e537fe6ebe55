use std::sync::Arc;

use crate::config::Config;
use crate::editor::registry::SessionRegistry;
use crate::identity::IdentityGateway;
use crate::llm_client::LlmClient;
use crate::storage::blob::BlobStore;
use crate::storage::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Postgres in production, in-memory when no database is configured.
    pub profiles: Arc<dyn ProfileStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub identity: Arc<dyn IdentityGateway>,
    pub sessions: Arc<SessionRegistry>,
    /// `None` when no Anthropic key is configured; cover letters are then unavailable.
    pub llm: Option<LlmClient>,
    /// Outbound HTTP for fetching the profile photo during PDF export.
    pub http: reqwest::Client,
}
