use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::free_text::PROSE_PROFILE;
use super::{broad_search_terms, DiscoveryStrategy, StrategyError, StrategyKind};
use crate::awards::models::{DiscoveryResult, PlayerIdentity};
use crate::awards::prompts;
use crate::awards::text_parser::parse_awards;
use crate::llm_client::capabilities::{MessageRole, RunStatus, SessionBackend, SessionMessage};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;

/// Fixed-interval, fixed-ceiling wait for a session run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Posts one research prompt into a session run by a pre-provisioned persona,
/// waits for the run, and parses the assistant's reply as prose.
///
/// Dropping the `discover` future abandons the poll loop at its next await.
pub struct ConversationalStrategy {
    backend: Arc<dyn SessionBackend>,
    persona_id: Option<String>,
    poll: PollConfig,
}

impl ConversationalStrategy {
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        persona_id: Option<String>,
        poll: PollConfig,
    ) -> Self {
        Self {
            backend,
            persona_id,
            poll,
        }
    }

    async fn await_run(&self, session_id: &str, run_id: &str) -> Result<(), StrategyError> {
        let mut state = self.backend.run_status(session_id, run_id).await?;
        let mut attempts = 0;

        while state.status.is_pending() && attempts < self.poll.max_attempts {
            debug!(
                "Run {} is {:?} (attempt {}/{})",
                run_id,
                state.status,
                attempts + 1,
                self.poll.max_attempts
            );
            tokio::time::sleep(self.poll.interval).await;
            state = self.backend.run_status(session_id, run_id).await?;
            attempts += 1;
        }

        match state.status {
            status if status.is_pending() => Err(StrategyError::Timeout { attempts }),
            RunStatus::Completed => Ok(()),
            RunStatus::Failed => Err(StrategyError::RunFailed(
                state
                    .last_error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )),
            other => Err(StrategyError::UnexpectedStatus(other)),
        }
    }

    async fn first_reply(&self, session_id: &str) -> Result<String, StrategyError> {
        let messages = self.backend.list_messages(session_id).await?;
        match messages.into_iter().next() {
            Some(SessionMessage {
                role: MessageRole::Assistant,
                text: Some(text),
            }) => Ok(text),
            _ => Err(StrategyError::NoResponse),
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for ConversationalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Conversational
    }

    async fn discover(&self, player: &PlayerIdentity) -> Result<DiscoveryResult, StrategyError> {
        let persona_id = self
            .persona_id
            .as_deref()
            .ok_or(StrategyError::MissingConfig("OPENAI_ASSISTANT_ID"))?;

        let session_id = self.backend.create_session().await?;
        self.backend
            .post_message(
                &session_id,
                MessageRole::User,
                &prompts::conversational_message(player),
            )
            .await?;
        let run_id = self.backend.start_run(&session_id, persona_id).await?;
        info!("Started run {run_id} in session {session_id} for {}", player.player_name);

        self.await_run(&session_id, &run_id).await?;
        let reply = self.first_reply(&session_id).await?;

        let awards = PROSE_PROFILE.records(parse_awards(&reply, &player.player_name));
        Ok(PROSE_PROFILE.finish(player, awards, broad_search_terms(player)))
    }
}
