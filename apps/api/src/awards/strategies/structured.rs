use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::{focused_search_terms, DiscoveryStrategy, StrategyError, StrategyKind, StrategyProfile};
use crate::awards::models::{
    DiscoveryResult, PlayerIdentity, RawCandidate, RecordDefaults, Significance,
};
use crate::awards::normalize::NormalizeRules;
use crate::awards::prompts;
use crate::awards::scoring::ScoringPolicy;
use crate::llm_client::capabilities::{CompletionBackend, CompletionRequest};

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 4000;

const PROFILE: StrategyProfile = StrategyProfile {
    rules: NormalizeRules {
        require_source_url: true,
        repair_titles: true,
    },
    defaults: RecordDefaults {
        significance: Significance::Regional,
        verified: true,
    },
    scoring: ScoringPolicy::CountTiered,
};

/// Answer shape enforced by the `award_results` schema.
#[derive(Debug, Deserialize)]
struct StructuredResponse {
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    awards: Vec<RawCandidate>,
    #[serde(default)]
    notes: Option<String>,
}

/// Schema-constrained JSON: the most structured and most trusted strategy.
pub struct StructuredStrategy {
    backend: Arc<dyn CompletionBackend>,
}

impl StructuredStrategy {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DiscoveryStrategy for StructuredStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Structured
    }

    async fn discover(&self, player: &PlayerIdentity) -> Result<DiscoveryResult, StrategyError> {
        let schema = prompts::award_results_schema();
        let system = prompts::structured_system();
        let user = prompts::structured_user(player);

        let content = self
            .backend
            .complete(CompletionRequest {
                system: &system,
                user: &user,
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
                response_schema: Some(&schema),
            })
            .await?;

        let parsed: StructuredResponse = serde_json::from_str(&content)
            .map_err(|e| StrategyError::Malformed(e.to_string()))?;

        info!(
            "Structured answer for {} (echoed as {:?}): {} raw awards{}",
            player.player_name,
            parsed.player_name,
            parsed.awards.len(),
            parsed
                .notes
                .as_deref()
                .map(|n| format!(", notes: {n}"))
                .unwrap_or_default()
        );

        let awards = PROFILE.records(parsed.awards);
        Ok(PROFILE.finish(player, awards, focused_search_terms(player)))
    }
}
