//! Line-heuristic parser for plaintext award listings.
//!
//! Tried in order, first non-empty wins:
//! 1. labeled blocks (`Name: ...`, `Description: ...`, ...)
//! 2. bare listings: a short capitalised line opens an award, following lines fill it
//! 3. a scan for well-known award names anywhere in the text

use std::sync::LazyLock;

use regex::Regex;

use crate::awards::models::{RawCandidate, RawYear};

pub const DEFAULT_DESCRIPTION: &str = "Award description not available";
pub const DEFAULT_ORGANIZATION: &str = "Unknown Organization";

const FALLBACK_ORGANIZATION: &str = "Various";
const FALLBACK_MATCHES_PER_PATTERN: usize = 3;

static LIST_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*•]\s+|\d+[.)]\s+)").expect("static regex must compile")
});
static BARE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("static regex must compile"));
static CATEGORY_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(sports|academic|personal|professional)$").expect("static regex must compile")
});
static SIGNIFICANCE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(local|regional|conference|national|international)$")
        .expect("static regex must compile")
});
static FALLBACK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(First-Team All-American|All-American|All-Conference|Player of the Year|MVP|Rookie of the Year|Championship|Champion)",
        r"(?i)(Player of the Week|Player of the Month|Defensive Player|Offensive Player)",
        r"(?i)(Academic All-American|Scholar-Athlete|Academic Honor)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex must compile"))
    .collect()
});

/// Parses model prose into raw candidates. Never fails; unparseable text yields
/// an empty list.
pub fn parse_awards(text: &str, player_name: &str) -> Vec<RawCandidate> {
    let lines: Vec<String> = text
        .lines()
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.iter().any(|l| label_of(l).is_some_and(|(label, _)| label == Label::Name)) {
        let labeled = parse_labeled(&lines);
        if !labeled.is_empty() {
            return labeled;
        }
    }

    let listed = parse_listing(&lines);
    if !listed.is_empty() {
        return listed;
    }

    scan_known_awards(text, player_name)
}

/// Drops list markers and bold markers.
fn clean_line(line: &str) -> String {
    let trimmed = line.trim();
    LIST_MARKER_RE
        .replace(trimmed, "")
        .replace("**", "")
        .trim()
        .to_string()
}

// ── Labeled blocks ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Name,
    Description,
    Year,
    Organization,
    Category,
    Significance,
    Image,
    Source,
}

fn label_of(line: &str) -> Option<(Label, &str)> {
    let (label, value) = line.split_once(':')?;
    let label = match label.trim().to_lowercase().as_str() {
        "name" | "award" | "achievement" => Label::Name,
        "description" => Label::Description,
        "year" | "date" => Label::Year,
        "organization" => Label::Organization,
        "category" => Label::Category,
        "significance" => Label::Significance,
        "image" => Label::Image,
        "source" | "source url" => Label::Source,
        _ => return None,
    };
    Some((label, value.trim()))
}

fn parse_labeled(lines: &[String]) -> Vec<RawCandidate> {
    let mut awards = Vec::new();
    let mut current: Option<RawCandidate> = None;

    for line in lines {
        let Some((label, value)) = label_of(line) else {
            continue;
        };
        if label == Label::Name {
            if let Some(done) = current.take() {
                awards.push(with_defaults(done));
            }
            current = Some(RawCandidate {
                name: non_empty(value),
                ..Default::default()
            });
            continue;
        }
        let Some(award) = current.as_mut() else {
            continue;
        };
        let value = non_empty(value);
        match label {
            Label::Description => award.description = value,
            Label::Year => award.year = value.map(RawYear::Text),
            Label::Organization => award.organization = value,
            Label::Category => award.category = value,
            Label::Significance => award.significance = value,
            Label::Image => award.image_url = value,
            Label::Source => award.source_url = value,
            Label::Name => {}
        }
    }
    if let Some(done) = current {
        awards.push(with_defaults(done));
    }
    awards.retain(|a| a.name.is_some());
    awards
}

// ── Bare listings ───────────────────────────────────────────────────────────

/// Short, capitalised, not a sentence, not a field value.
fn is_award_name(line: &str) -> bool {
    let len = line.chars().count();
    let starts_capitalised = line
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() && !c.is_lowercase());

    len > 5
        && len < 100
        && starts_capitalised
        && !line.contains(':')
        && !line.contains("http")
        && !line.ends_with(['.', '!', '?'])
        && !BARE_YEAR_RE.is_match(line)
        && !CATEGORY_WORD_RE.is_match(line)
        && !SIGNIFICANCE_WORD_RE.is_match(line)
        && !line.contains("Category")
        && !line.contains("Significance")
}

fn parse_listing(lines: &[String]) -> Vec<RawCandidate> {
    let mut awards = Vec::new();
    let mut current: Option<RawCandidate> = None;

    for line in lines {
        if is_award_name(line) && !expects_organization(current.as_ref()) {
            if let Some(done) = current.take() {
                awards.push(with_defaults(done));
            }
            current = Some(RawCandidate {
                name: Some(line.clone()),
                ..Default::default()
            });
            continue;
        }
        let Some(award) = current.as_mut() else {
            continue;
        };
        assign_listing_field(award, line);
    }
    if let Some(done) = current {
        awards.push(with_defaults(done));
    }
    awards
}

/// Listings run name, description, year, organization: a capitalised line
/// right after the year is the awarding body, not the next award.
fn expects_organization(current: Option<&RawCandidate>) -> bool {
    current.is_some_and(|a| a.year.is_some() && a.organization.is_none())
}

fn assign_listing_field(award: &mut RawCandidate, line: &str) {
    if line.starts_with("http") {
        award.source_url = Some(line.to_string());
    } else if let Some(value) = labeled_value(line, "Category") {
        award.category = Some(value.to_lowercase());
    } else if CATEGORY_WORD_RE.is_match(line) {
        award.category = Some(line.to_lowercase());
    } else if let Some(value) = labeled_value(line, "Significance") {
        award.significance = Some(value.to_lowercase());
    } else if SIGNIFICANCE_WORD_RE.is_match(line) {
        award.significance = Some(line.to_lowercase());
    } else if award.year.is_none() && BARE_YEAR_RE.is_match(line) {
        award.year = line.parse().ok().map(RawYear::Number);
    } else if award.description.is_none() && line.chars().count() > 10 {
        award.description = Some(line.to_string());
    } else if award.organization.is_none() && line.chars().count() > 3 && !line.contains("http") {
        award.organization = Some(line.to_string());
    }
}

fn labeled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let (head, value) = line.split_once(':')?;
    head.trim()
        .eq_ignore_ascii_case(label)
        .then(|| value.trim())
}

// ── Known-name scan ─────────────────────────────────────────────────────────

fn scan_known_awards(text: &str, player_name: &str) -> Vec<RawCandidate> {
    FALLBACK_PATTERNS
        .iter()
        .flat_map(|rx| {
            rx.find_iter(text)
                .take(FALLBACK_MATCHES_PER_PATTERN)
                .map(|m| m.as_str().trim().to_string())
        })
        .map(|name| RawCandidate {
            name: Some(name),
            description: Some(format!("Recognition for {player_name} during their career")),
            organization: Some(FALLBACK_ORGANIZATION.to_string()),
            category: Some("sports".to_string()),
            significance: Some("national".to_string()),
            ..Default::default()
        })
        .collect()
}

fn with_defaults(mut award: RawCandidate) -> RawCandidate {
    award
        .description
        .get_or_insert_with(|| DEFAULT_DESCRIPTION.to_string());
    award
        .organization
        .get_or_insert_with(|| DEFAULT_ORGANIZATION.to_string());
    award
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
