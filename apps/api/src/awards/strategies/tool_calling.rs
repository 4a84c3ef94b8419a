use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{broad_search_terms, DiscoveryStrategy, StrategyError, StrategyKind, StrategyProfile};
use crate::awards::models::{
    DiscoveryResult, PlayerIdentity, RawCandidate, RecordDefaults, Significance,
};
use crate::awards::normalize::NormalizeRules;
use crate::awards::prompts::{self, CREATE_AWARD_TOOL};
use crate::awards::scoring::ScoringPolicy;
use crate::llm_client::capabilities::{CompletionRequest, ToolCallingBackend};

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 4000;

const PROFILE: StrategyProfile = StrategyProfile {
    rules: NormalizeRules {
        require_source_url: false,
        repair_titles: false,
    },
    defaults: RecordDefaults {
        significance: Significance::Regional,
        verified: true,
    },
    scoring: ScoringPolicy::SingleInvocation,
};

/// Offers the model a search tool and a create-award tool and keeps whatever
/// single `create_award_entry` call it makes in its one turn.
pub struct ToolCallingStrategy {
    backend: Arc<dyn ToolCallingBackend>,
}

impl ToolCallingStrategy {
    pub fn new(backend: Arc<dyn ToolCallingBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DiscoveryStrategy for ToolCallingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ToolCalling
    }

    async fn discover(&self, player: &PlayerIdentity) -> Result<DiscoveryResult, StrategyError> {
        let system = prompts::tool_calling_system();
        let user = prompts::tool_calling_user(player);
        let tools = prompts::tool_definitions();

        let invocation = self
            .backend
            .complete_with_tools(
                CompletionRequest {
                    system: &system,
                    user: &user,
                    temperature: TEMPERATURE,
                    max_tokens: MAX_TOKENS,
                    response_schema: None,
                },
                &tools,
            )
            .await?;

        // Only one turn is read, so at most one award comes back.
        let raw = match invocation {
            Some(call) if call.name == CREATE_AWARD_TOOL => {
                let candidate: RawCandidate = serde_json::from_value(call.arguments)
                    .map_err(|e| StrategyError::Malformed(e.to_string()))?;
                vec![candidate]
            }
            Some(call) => {
                info!("Model invoked '{}', no award entry created", call.name);
                Vec::new()
            }
            None => Vec::new(),
        };

        let awards = PROFILE.records(raw);
        Ok(PROFILE.finish(player, awards, broad_search_terms(player)))
    }
}
