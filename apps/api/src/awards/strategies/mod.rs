//! Discovery Strategies: four independent ways of eliciting awards from the model.
//!
//! Every strategy produces raw candidates in its own way, then hands them to the
//! shared normalize → dedupe → record → score pipeline through its `StrategyProfile`.
//! The orchestrator only ever sees `Arc<dyn DiscoveryStrategy>`.

pub mod conversational;
pub mod free_text;
pub mod structured;
pub mod tool_calling;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::awards::dedup::dedupe;
use crate::awards::models::{
    AwardCandidate, AwardRecord, DiscoveryResult, PlayerIdentity, RawCandidate, RecordDefaults,
};
use crate::awards::normalize::{normalize, NormalizeRules};
use crate::awards::scoring::ScoringPolicy;
use crate::llm_client::capabilities::RunStatus;
use crate::llm_client::LlmError;

pub use conversational::{ConversationalStrategy, PollConfig};
pub use free_text::FreeTextStrategy;
pub use structured::StructuredStrategy;
pub use tool_calling::ToolCallingStrategy;

// ────────────────────────────────────────────────────────────────────────────
// Contract
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Structured,
    FreeText,
    Conversational,
    ToolCalling,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Structured => "structured",
            StrategyKind::FreeText => "free_text",
            StrategyKind::Conversational => "conversational",
            StrategyKind::ToolCalling => "tool_calling",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("completion backend error: {0}")]
    Llm(#[from] LlmError),

    #[error("malformed model response: {0}")]
    Malformed(String),

    #[error("session run timed out after {attempts} polls")]
    Timeout { attempts: u32 },

    #[error("session run failed: {0}")]
    RunFailed(String),

    #[error("unexpected run status: {0:?}")]
    UnexpectedStatus(RunStatus),

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("no response from assistant")]
    NoResponse,
}

/// One way of finding a player's awards.
///
/// `Ok` may carry zero awards; whether that ends the search is the orchestrator's call.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn discover(&self, player: &PlayerIdentity) -> Result<DiscoveryResult, StrategyError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Shared post-processing
// ────────────────────────────────────────────────────────────────────────────

/// How a strategy validates, fills and scores what the model gave it.
#[derive(Debug, Clone, Copy)]
pub struct StrategyProfile {
    pub rules: NormalizeRules,
    pub defaults: RecordDefaults,
    pub scoring: ScoringPolicy,
}

impl StrategyProfile {
    /// Normalizes, drops invalid candidates, dedupes and builds records.
    pub fn records(&self, raw: Vec<RawCandidate>) -> Vec<AwardRecord> {
        let candidates: Vec<AwardCandidate> = raw
            .into_iter()
            .filter_map(|candidate| normalize(candidate, self.rules))
            .collect();
        dedupe(candidates)
            .into_iter()
            .map(|candidate| candidate.into_record(self.defaults))
            .collect()
    }

    pub fn finish(
        &self,
        player: &PlayerIdentity,
        awards: Vec<AwardRecord>,
        search_terms: Vec<String>,
    ) -> DiscoveryResult {
        DiscoveryResult {
            player_name: player.player_name.clone(),
            confidence_score: self.scoring.score(&awards),
            awards,
            search_terms,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Search terms (telemetry only)
// ────────────────────────────────────────────────────────────────────────────

/// The few targeted queries the structured strategy reports.
pub fn focused_search_terms(player: &PlayerIdentity) -> Vec<String> {
    let name = &player.player_name;
    let sport = &player.sport;
    let mut terms = vec![
        format!("{name} {sport} awards"),
        format!("{name} {sport} honors"),
    ];
    terms.extend(player.college.iter().map(|college| format!("{name} {college} awards")));
    terms.extend(player.team.iter().map(|team| format!("{name} {team} awards")));
    terms
}

const BROAD_TOPICS: &[&str] = &[
    "player of the week",
    "player of the year",
    "all conference",
    "all american",
    "championship",
    "MVP",
    "rookie of the year",
    "scholar athlete",
    "team captain",
    "academic honors",
];

/// The wide sweep reported by the prose-based strategies.
pub fn broad_search_terms(player: &PlayerIdentity) -> Vec<String> {
    let name = &player.player_name;
    let sport = &player.sport;
    let mut terms = vec![
        format!("{name} {sport} awards"),
        format!("{name} {sport} achievements"),
        format!("{name} {sport} honors"),
    ];
    terms.extend(BROAD_TOPICS.iter().map(|topic| format!("{name} {topic}")));

    if let Some(college) = &player.college {
        for suffix in ["awards", "achievements", "all conference", "all american"] {
            terms.push(format!("{name} {college} {suffix}"));
        }
    }
    if let Some(team) = &player.team {
        for suffix in ["awards", "achievements"] {
            terms.push(format!("{name} {team} {suffix}"));
        }
    }
    terms
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::awards::models::Significance;

    fn player() -> PlayerIdentity {
        PlayerIdentity {
            player_name: "Jane Doe".to_string(),
            sport: "Football".to_string(),
            college: Some("California".to_string()),
            team: Some("Chargers".to_string()),
        }
    }

    #[test]
    fn test_broad_terms_count() {
        assert_eq!(broad_search_terms(&test_support::jane_doe()).len(), 13);
        assert_eq!(broad_search_terms(&player()).len(), 19);
        assert!(broad_search_terms(&player()).contains(&"Jane Doe California all american".to_string()));
    }

    #[test]
    fn test_focused_terms_skip_unknown_affiliations() {
        assert_eq!(
            focused_search_terms(&test_support::jane_doe()),
            vec!["Jane Doe Football awards", "Jane Doe Football honors"]
        );
        assert_eq!(focused_search_terms(&player()).len(), 4);
    }

    #[test]
    fn test_profile_drops_invalid_and_duplicate_candidates() {
        let profile = StrategyProfile {
            rules: NormalizeRules::default(),
            defaults: RecordDefaults {
                significance: Significance::Local,
                verified: true,
            },
            scoring: ScoringPolicy::CountTiered,
        };
        let valid = RawCandidate {
            name: Some("Team MVP".to_string()),
            description: Some("Voted by teammates".to_string()),
            organization: Some("Cal Football".to_string()),
            ..Default::default()
        };
        let missing_org = RawCandidate {
            organization: None,
            ..valid.clone()
        };

        let records = profile.records(vec![valid.clone(), missing_org, valid]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].significance, Significance::Local);

        let result = profile.finish(&player(), records, vec![]);
        assert_eq!(result.confidence_score, 0.6);
        assert_eq!(result.player_name, "Jane Doe");
    }

    #[test]
    fn test_strategy_kind_display() {
        assert_eq!(StrategyKind::FreeText.to_string(), "free_text");
    }
}
