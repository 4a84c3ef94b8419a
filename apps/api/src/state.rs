use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::awards::orchestrator::DiscoveryOrchestrator;
use crate::awards::store::AwardStore;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<LlmClient>,
    pub orchestrator: Arc<DiscoveryOrchestrator>,
    /// Persistence adapter. Default: `PgAwardStore`.
    pub awards: Arc<dyn AwardStore>,
    /// Cancelled on shutdown; each discovery runs under a child token.
    pub shutdown: CancellationToken,
}
