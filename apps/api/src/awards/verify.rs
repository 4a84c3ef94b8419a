use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::capabilities::{CompletionBackend, CompletionRequest};
use crate::llm_client::prompts::FACT_CHECK_SYSTEM;

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 10;

/// The facts a single-award check is asked about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardClaim {
    pub name: String,
    pub description: String,
    pub organization: String,
    pub year: i32,
}

/// Asks the model whether an award is legitimate. Any failure counts as "no".
pub async fn verify_award(backend: &dyn CompletionBackend, claim: &AwardClaim) -> bool {
    let user = format!(
        "Verify this award: {} - {} by {} in {}",
        claim.name, claim.description, claim.organization, claim.year
    );
    let request = CompletionRequest {
        system: FACT_CHECK_SYSTEM,
        user: &user,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        response_schema: None,
    };

    match backend.complete(request).await {
        Ok(answer) => answer.to_lowercase().contains("true"),
        Err(e) => {
            warn!("Fact check for '{}' failed: {}", claim.name, e);
            false
        }
    }
}
