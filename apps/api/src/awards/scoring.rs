//! Confidence scoring. Each strategy declares which policy it reports with.

use crate::awards::models::AwardRecord;
use crate::awards::text_parser::{DEFAULT_DESCRIPTION, DEFAULT_ORGANIZATION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Tiered on how many awards were found.
    CountTiered,
    /// Averaged per-award completeness, capped at 1.0.
    Completeness,
    /// One tool invocation: high if it produced an award, low otherwise.
    SingleInvocation,
}

impl ScoringPolicy {
    pub fn score(&self, awards: &[AwardRecord]) -> f64 {
        match self {
            ScoringPolicy::CountTiered => count_tiered(awards.len()),
            ScoringPolicy::Completeness => completeness(awards),
            ScoringPolicy::SingleInvocation => {
                if awards.is_empty() {
                    0.2
                } else {
                    0.8
                }
            }
        }
    }
}

fn count_tiered(count: usize) -> f64 {
    match count {
        n if n >= 5 => 0.9,
        n if n >= 3 => 0.75,
        n if n >= 1 => 0.6,
        _ => 0.0,
    }
}

fn completeness(awards: &[AwardRecord]) -> f64 {
    if awards.is_empty() {
        return 0.0;
    }
    let total: f64 = awards.iter().map(award_completeness).sum();
    (total / awards.len() as f64).min(1.0)
}

fn award_completeness(award: &AwardRecord) -> f64 {
    let mut score = 1.0;
    if award.description != DEFAULT_DESCRIPTION {
        score += 0.2;
    }
    if award.organization != DEFAULT_ORGANIZATION {
        score += 0.2;
    }
    if award.image_url.is_some() {
        score += 0.3;
    }
    if award.source_url.is_some() {
        score += 0.3;
    }
    if award.significance.is_wide_reach() {
        score += 0.2;
    }
    score
}
