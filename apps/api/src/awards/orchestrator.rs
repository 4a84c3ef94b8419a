//! Discovery Orchestrator: tries each strategy in turn until one succeeds.
//!
//! Strategies run strictly one after another. A failure is logged, recorded and
//! falls through to the next strategy; only exhausting the chain is an error.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::awards::dedup::dedupe;
use crate::awards::models::{DiscoveryResult, PlayerIdentity};
use crate::awards::strategies::{
    ConversationalStrategy, DiscoveryStrategy, FreeTextStrategy, PollConfig, StrategyKind,
    StructuredStrategy, ToolCallingStrategy,
};
use crate::llm_client::LlmClient;

/// What a strategy that succeeds with zero awards means for the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyResultPolicy {
    /// An empty success ends the search.
    #[default]
    Accept,
    /// An empty success is recorded as a failure and the next strategy runs.
    FallThrough,
}

impl FromStr for EmptyResultPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" => Ok(EmptyResultPolicy::Accept),
            "fall_through" | "fallthrough" => Ok(EmptyResultPolicy::FallThrough),
            other => Err(format!(
                "unknown empty-result policy '{other}' (expected accept or fall_through)"
            )),
        }
    }
}

/// One entry in the diagnostic log of strategies that did not win.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyFailure {
    pub strategy: StrategyKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryOutcome {
    pub strategy: StrategyKind,
    pub result: DiscoveryResult,
    /// Strategies tried before the winner, in order.
    pub failures: Vec<StrategyFailure>,
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("{}", composite_message(.failures))]
    AllStrategiesFailed { failures: Vec<StrategyFailure> },

    #[error("award discovery was cancelled")]
    Cancelled,
}

fn composite_message(failures: &[StrategyFailure]) -> String {
    let parts: Vec<String> = failures
        .iter()
        .map(|f| format!("{} - {}", f.strategy, f.message))
        .collect();
    format!("Award discovery failed: {}", parts.join(", "))
}

pub struct DiscoveryOrchestrator {
    strategies: Vec<Arc<dyn DiscoveryStrategy>>,
    empty_results: EmptyResultPolicy,
}

impl DiscoveryOrchestrator {
    pub fn new(strategies: Vec<Arc<dyn DiscoveryStrategy>>, empty_results: EmptyResultPolicy) -> Self {
        Self {
            strategies,
            empty_results,
        }
    }

    /// The production chain: structured, free text, conversational, tool calling.
    pub fn standard(
        client: Arc<LlmClient>,
        persona_id: Option<String>,
        poll: PollConfig,
        empty_results: EmptyResultPolicy,
    ) -> Self {
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![
            Arc::new(StructuredStrategy::new(client.clone())),
            Arc::new(FreeTextStrategy::new(client.clone(), client.clone())),
            Arc::new(ConversationalStrategy::new(client.clone(), persona_id, poll)),
            Arc::new(ToolCallingStrategy::new(client)),
        ];
        Self::new(strategies, empty_results)
    }

    pub async fn discover(
        &self,
        player: &PlayerIdentity,
        cancel: &CancellationToken,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            let kind = strategy.kind();
            info!("Attempting {} discovery for {}", kind, player.player_name);

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("Award discovery for {} cancelled during {}", player.player_name, kind);
                    return Err(DiscoveryError::Cancelled);
                }
                attempt = strategy.discover(player) => attempt,
            };

            match attempt {
                Ok(result)
                    if result.awards.is_empty()
                        && self.empty_results == EmptyResultPolicy::FallThrough =>
                {
                    warn!("{} discovery returned no awards, falling through", kind);
                    failures.push(StrategyFailure {
                        strategy: kind,
                        message: "returned no awards".to_string(),
                    });
                }
                Ok(mut result) => {
                    result.awards = dedupe(result.awards);
                    info!(
                        "{} discovery succeeded: {} awards, confidence {:.2}, after {} failures",
                        kind,
                        result.awards.len(),
                        result.confidence_score,
                        failures.len()
                    );
                    return Ok(DiscoveryOutcome {
                        strategy: kind,
                        result,
                        failures,
                    });
                }
                Err(e) => {
                    warn!("{} discovery failed, falling through: {}", kind, e);
                    failures.push(StrategyFailure {
                        strategy: kind,
                        message: e.to_string(),
                    });
                }
            }
        }

        let err = DiscoveryError::AllStrategiesFailed { failures };
        error!("{}", err);
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::awards::models::{AwardRecord, Category, Significance};
    use crate::awards::strategies::test_support::jane_doe;
    use crate::awards::strategies::StrategyError;
    use crate::llm_client::capabilities::{RunStatus, ToolInvocation};
    use crate::llm_client::fakes::{
        ScriptedCompletion, ScriptedImages, ScriptedSession, ScriptedTools,
    };

    /// Returns a canned outcome and counts calls.
    struct CannedStrategy {
        kind: StrategyKind,
        awards: Option<Vec<AwardRecord>>,
        calls: AtomicUsize,
    }

    impl CannedStrategy {
        fn ok(kind: StrategyKind, awards: Vec<AwardRecord>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                awards: Some(awards),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(kind: StrategyKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                awards: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DiscoveryStrategy for CannedStrategy {
        fn kind(&self) -> StrategyKind {
            self.kind
        }

        async fn discover(
            &self,
            player: &PlayerIdentity,
        ) -> Result<DiscoveryResult, StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.awards {
                Some(awards) => Ok(DiscoveryResult {
                    player_name: player.player_name.clone(),
                    awards: awards.clone(),
                    search_terms: vec![],
                    confidence_score: 0.5,
                }),
                None => Err(StrategyError::Malformed(format!("{} broke", self.kind))),
            }
        }
    }

    /// Never finishes.
    struct StalledStrategy;

    #[async_trait]
    impl DiscoveryStrategy for StalledStrategy {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Structured
        }

        async fn discover(&self, _: &PlayerIdentity) -> Result<DiscoveryResult, StrategyError> {
            std::future::pending().await
        }
    }

    fn award(name: &str, year: i32) -> AwardRecord {
        AwardRecord {
            id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            description: "desc".to_string(),
            category: Category::Sports,
            year,
            organization: "NCAA".to_string(),
            image_url: None,
            source_url: None,
            significance: Significance::Regional,
            verified: true,
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_tool_calling_after_three_backend_failures() {
        let create_call = ToolInvocation {
            name: "create_award_entry".to_string(),
            arguments: json!({
                "name": "Pac-10 Defensive Player of the Year",
                "description": "Led the conference in interceptions",
                "category": "sports",
                "year": 2009,
                "organization": "Pac-10 Conference",
                "significance": "regional"
            }),
        };
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![
            Arc::new(StructuredStrategy::new(Arc::new(ScriptedCompletion::failing(
                "schema endpoint down",
            )))),
            Arc::new(FreeTextStrategy::new(
                Arc::new(ScriptedCompletion::failing("completion endpoint down")),
                Arc::new(ScriptedImages::new(vec![])),
            )),
            Arc::new(ConversationalStrategy::new(
                Arc::new(ScriptedSession::unreachable("threads endpoint down")),
                Some("asst_locker".to_string()),
                PollConfig::default(),
            )),
            Arc::new(ToolCallingStrategy::new(Arc::new(ScriptedTools::new(Ok(
                Some(create_call),
            ))))),
        ];
        let orchestrator = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::Accept);

        let outcome = orchestrator
            .discover(&jane_doe(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.strategy, StrategyKind::ToolCalling);
        assert_eq!(outcome.result.awards.len(), 1);
        assert_eq!(
            outcome.result.awards[0].name,
            "Pac-10 Defensive Player of the Year"
        );
        assert_eq!(outcome.failures.len(), 3);
        let failed: Vec<_> = outcome.failures.iter().map(|f| f.strategy).collect();
        assert_eq!(
            failed,
            vec![
                StrategyKind::Structured,
                StrategyKind::FreeText,
                StrategyKind::Conversational
            ]
        );
        assert!(outcome.failures[0].message.contains("schema endpoint down"));
        assert!(outcome.failures[2].message.contains("threads endpoint down"));
    }

    #[tokio::test]
    async fn test_all_failures_compose_one_error() {
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![
            CannedStrategy::failing(StrategyKind::Structured),
            CannedStrategy::failing(StrategyKind::FreeText),
            CannedStrategy::failing(StrategyKind::Conversational),
            CannedStrategy::failing(StrategyKind::ToolCalling),
        ];
        let err = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::Accept)
            .discover(&jane_doe(), &CancellationToken::new())
            .await
            .unwrap_err();

        match &err {
            DiscoveryError::AllStrategiesFailed { failures } => assert_eq!(failures.len(), 4),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Award discovery failed: \
             structured - malformed model response: structured broke, \
             free_text - malformed model response: free_text broke, \
             conversational - malformed model response: conversational broke, \
             tool_calling - malformed model response: tool_calling broke"
        );
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = CannedStrategy::ok(StrategyKind::Structured, vec![award("MVP", 2010)]);
        let second = CannedStrategy::ok(StrategyKind::FreeText, vec![award("Captain", 2011)]);
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![first.clone(), second.clone()];
        let outcome = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::Accept)
            .discover(&jane_doe(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.strategy, StrategyKind::Structured);
        assert!(outcome.failures.is_empty());
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_success_is_accepted_by_default() {
        let first = CannedStrategy::ok(StrategyKind::Structured, vec![]);
        let second = CannedStrategy::ok(StrategyKind::FreeText, vec![award("MVP", 2010)]);
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![first, second.clone()];
        let outcome = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::default())
            .discover(&jane_doe(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.strategy, StrategyKind::Structured);
        assert!(outcome.result.awards.is_empty());
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_success_falls_through_when_configured() {
        let first = CannedStrategy::ok(StrategyKind::Structured, vec![]);
        let second = CannedStrategy::ok(StrategyKind::FreeText, vec![award("MVP", 2010)]);
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![first, second];
        let outcome = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::FallThrough)
            .discover(&jane_doe(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.strategy, StrategyKind::FreeText);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].message, "returned no awards");
    }

    #[tokio::test]
    async fn test_winner_is_deduplicated() {
        let first = CannedStrategy::ok(
            StrategyKind::Structured,
            vec![award("MVP", 2010), award(" mvp", 2010), award("MVP", 2011)],
        );
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![first];
        let outcome = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::Accept)
            .discover(&jane_doe(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.result.awards.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let first = CannedStrategy::ok(StrategyKind::Structured, vec![award("MVP", 2010)]);
        let token = CancellationToken::new();
        token.cancel();

        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![first.clone()];
        let err = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::Accept)
            .discover(&jane_doe(), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::Cancelled));
        assert_eq!(first.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_poll_loop() {
        let session = Arc::new(ScriptedSession::new(vec![RunStatus::InProgress], vec![]));
        let fallback = CannedStrategy::ok(StrategyKind::ToolCalling, vec![award("MVP", 2010)]);
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![
            Arc::new(ConversationalStrategy::new(
                session.clone(),
                Some("asst_locker".to_string()),
                PollConfig::default(),
            )),
            fallback.clone(),
        ];
        let orchestrator = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::Accept);

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let err = orchestrator.discover(&jane_doe(), &token).await.unwrap_err();

        assert!(matches!(err, DiscoveryError::Cancelled));
        assert!(session.poll_count() < 30);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_stalled_strategy_is_abandoned_on_cancel() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![Arc::new(StalledStrategy)];
        let orchestrator = DiscoveryOrchestrator::new(strategies, EmptyResultPolicy::Accept);

        let player = jane_doe();
        let (result, _) = tokio::join!(orchestrator.discover(&player, &token), async move {
            tokio::task::yield_now().await;
            trigger.cancel();
        });
        assert!(matches!(result, Err(DiscoveryError::Cancelled)));
    }

    #[test]
    fn test_empty_result_policy_parses() {
        assert_eq!("accept".parse::<EmptyResultPolicy>(), Ok(EmptyResultPolicy::Accept));
        assert_eq!(
            "FALL_THROUGH".parse::<EmptyResultPolicy>(),
            Ok(EmptyResultPolicy::FallThrough)
        );
        assert!("sometimes".parse::<EmptyResultPolicy>().is_err());
    }
}
