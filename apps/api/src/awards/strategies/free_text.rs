use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{broad_search_terms, DiscoveryStrategy, StrategyError, StrategyKind, StrategyProfile};
use crate::awards::models::{DiscoveryResult, PlayerIdentity, RecordDefaults, Significance};
use crate::awards::normalize::NormalizeRules;
use crate::awards::prompts;
use crate::awards::scoring::ScoringPolicy;
use crate::awards::text_parser::parse_awards;
use crate::llm_client::capabilities::{CompletionBackend, CompletionRequest, ImageGenerator};

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 4000;
pub const AWARD_IMAGE_SIZE: &str = "256x256";

pub(super) const PROSE_PROFILE: StrategyProfile = StrategyProfile {
    rules: NormalizeRules {
        require_source_url: false,
        repair_titles: false,
    },
    defaults: RecordDefaults {
        significance: Significance::Local,
        verified: true,
    },
    scoring: ScoringPolicy::Completeness,
};

/// Plain completion parsed line by line, with trophy artwork per award.
pub struct FreeTextStrategy {
    backend: Arc<dyn CompletionBackend>,
    images: Arc<dyn ImageGenerator>,
}

impl FreeTextStrategy {
    pub fn new(backend: Arc<dyn CompletionBackend>, images: Arc<dyn ImageGenerator>) -> Self {
        Self { backend, images }
    }
}

#[async_trait]
impl DiscoveryStrategy for FreeTextStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FreeText
    }

    async fn discover(&self, player: &PlayerIdentity) -> Result<DiscoveryResult, StrategyError> {
        let system = prompts::free_text_system();
        let user = prompts::free_text_user(player);

        let content = self
            .backend
            .complete(CompletionRequest {
                system: &system,
                user: &user,
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
                response_schema: None,
            })
            .await?;

        let mut awards = PROSE_PROFILE.records(parse_awards(&content, &player.player_name));
        info!(
            "Parsed {} awards for {}, generating images",
            awards.len(),
            player.player_name
        );

        // One call per award, in order.
        for award in awards.iter_mut() {
            let prompt = prompts::award_image_prompt(award);
            match self.images.generate_image(&prompt, AWARD_IMAGE_SIZE).await {
                Some(url) => award.image_url = Some(url),
                None => warn!("No image generated for award '{}'", award.name),
            }
        }

        Ok(PROSE_PROFILE.finish(player, awards, broad_search_terms(player)))
    }
}
