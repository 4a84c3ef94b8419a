//! Source Normalizer: turns one raw candidate into a validated `AwardCandidate`.
//!
//! Everything here is pure and total: bad input is coerced or dropped, never raised.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::awards::models::{AwardCandidate, Category, RawCandidate, RawYear, Significance};

/// A name longer than this is treated as a sentence, not a title.
const MAX_TITLE_CHARS: usize = 120;
/// A description shorter than this may really be the title.
const MAX_SWAPPABLE_DESCRIPTION_CHARS: usize = 80;
/// Word budget for the last-resort title.
const COMPRESSED_TITLE_WORDS: usize = 6;
const MAX_REPAIR_PASSES: usize = 4;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(19|20)\d{2}").expect("static regex must compile"));
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\((https?://[^)\s]+)\)").expect("static regex must compile")
});
static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s)]+").expect("static regex must compile"));
static TRAILING_URL_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[).,;:]+$").expect("static regex must compile"));
// Cue words that only appear in prose. Title words such as "Player" or "Season"
// are left out so "AFC Defensive Player of the Week" is not mistaken for prose.
static DESCRIPTION_CUES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(recognizes|honors|awarded|given|for|who|which|after|during|selected|named|was)\b")
        .expect("static regex must compile")
});
static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]$").expect("static regex must compile"));
static FIRST_SENTENCE_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?].*$").expect("static regex must compile"));
static TITLE_SEPARATORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s·•]+").expect("static regex must compile"));
static TITLE_TRAILING_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,;:!?\-–—]+$").expect("static regex must compile"));

/// Known award-title shapes, most specific first.
static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i:first|second|third)-?(?i:team)\s+(?i:all)-[\w-]+(?:\s[A-Z0-9][\w-]*)*",
        r"(?i:all)-[\w-]+(?:\s[A-Z0-9][\w-]*)*",
        r"\b[A-Z]{2,4}\s+(?i:offensive|defensive)\s+(?i:player\s+of\s+the\s+week)\b",
        r"(?i)\b(offensive|defensive)\s+player\s+of\s+the\s+(week|month|year)\b",
        r"(?i)\brookie\s+of\s+the\s+year\b",
        r"(?i)\bMVP\b",
        r"(?:[A-Z][\w-]*\s+){0,3}(?i:champion(?:ship)?)(?:\s+(?i:title|winner))?\b",
        r"(?i)(pac-\d+|big\s?ten|SEC|ACC|big\s?12)[^,.]*player\s+of\s+the\s+year",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex must compile"))
    .collect()
});

/// Per-strategy validation rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeRules {
    /// Drop candidates without a well-formed http(s) source.
    pub require_source_url: bool,
    /// Apply title/description repair.
    pub repair_titles: bool,
}

/// Validates and cleans one raw candidate. `None` means the candidate is invalid.
pub fn normalize(raw: RawCandidate, rules: NormalizeRules) -> Option<AwardCandidate> {
    let name = non_empty(raw.name)?;
    let description = non_empty(raw.description)?;
    let organization = non_empty(raw.organization)?;

    let source_url = raw.source_url.as_deref().and_then(normalize_source_url);
    if rules.require_source_url && source_url.is_none() {
        return None;
    }

    let year = raw
        .year
        .as_ref()
        .and_then(year_from_raw)
        .or_else(|| raw.date.as_deref().and_then(extract_year));

    let (name, description) = if rules.repair_titles {
        repair_title(&name, &description)
    } else {
        (name, description)
    };

    Some(AwardCandidate {
        name,
        description,
        organization,
        year,
        category: raw.category.as_deref().and_then(Category::parse),
        significance: raw.significance.as_deref().and_then(Significance::from_native),
        source_url,
        image_url: raw.image_url.as_deref().and_then(normalize_source_url),
    })
}

/// First `19xx`/`20xx` run in free text.
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

fn year_from_raw(raw: &RawYear) -> Option<i32> {
    match raw {
        RawYear::Number(n) => i32::try_from(*n).ok().filter(|y| (1900..=2100).contains(y)),
        RawYear::Decimal(f) if f.is_finite() && (1900.0..=2100.0).contains(f) => {
            Some(f.trunc() as i32)
        }
        RawYear::Decimal(_) => None,
        RawYear::Text(text) => extract_year(text),
    }
}

/// Pulls one well-formed http(s) URL out of whatever the model wrote.
///
/// Handles markdown links, URLs embedded in prose and trailing punctuation.
pub fn normalize_source_url(raw: &str) -> Option<String> {
    let mut candidate = raw.trim().to_string();
    if candidate.is_empty() {
        return None;
    }

    if let Some(link) = MARKDOWN_LINK_RE.captures(&candidate).and_then(|c| c.get(1)) {
        candidate = link.as_str().to_string();
    }
    if let Some(url) = BARE_URL_RE.find(&candidate) {
        candidate = url.as_str().to_string();
    }
    let candidate = TRAILING_URL_PUNCT_RE.replace(&candidate, "");

    let url = Url::parse(&candidate).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

/// Heuristic: is this text a sentence rather than a title?
pub fn looks_like_description(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    text.chars().count() > MAX_TITLE_CHARS
        || SENTENCE_END_RE.is_match(text)
        || DESCRIPTION_CUES_RE.is_match(text)
}

/// Finds a compact known award title inside longer text.
pub fn extract_title_from(text: &str) -> Option<String> {
    TITLE_PATTERNS.iter().find_map(|rx| {
        rx.find(text).map(|m| {
            m.as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
    })
}

/// Repairs a title that holds description text.
///
/// Swaps the two fields when the description is really the title; otherwise
/// extracts a known title, and as a last resort keeps the first clause.
/// Repeated until stable so that repairing twice changes nothing.
pub fn repair_title(name: &str, description: &str) -> (String, String) {
    let mut current = (name.trim().to_string(), description.trim().to_string());
    for _ in 0..MAX_REPAIR_PASSES {
        let next = repair_once(&current.0, &current.1);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn repair_once(name: &str, description: &str) -> (String, String) {
    let mut name = name.to_string();
    let mut description = description.to_string();

    let name_is_description = looks_like_description(&name);
    let description_is_title = !looks_like_description(&description)
        && description.chars().count() < MAX_SWAPPABLE_DESCRIPTION_CHARS;

    if name_is_description && description_is_title {
        std::mem::swap(&mut name, &mut description);
    } else if name_is_description {
        let extracted = extract_title_from(&description)
            .or_else(|| extract_title_from(&name))
            .filter(|t| !looks_like_description(t));
        name = match extracted {
            Some(title) => title,
            None => compress_title(&name),
        };
    }

    let cleaned = clean_title(&name);
    let name = if cleaned.is_empty() {
        name.trim().to_string()
    } else {
        cleaned
    };
    (name, description)
}

/// First clause, at most six words.
fn compress_title(text: &str) -> String {
    let first_clause = FIRST_SENTENCE_TAIL_RE.replace(text, "");
    let words: Vec<&str> = first_clause
        .split_whitespace()
        .take(COMPRESSED_TITLE_WORDS)
        .collect();
    if words.is_empty() {
        text.split_whitespace()
            .take(COMPRESSED_TITLE_WORDS)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        words.join(" ")
    }
}

/// Collapses separators and strips trailing punctuation.
pub fn clean_title(name: &str) -> String {
    let collapsed = TITLE_SEPARATORS_RE.replace_all(name, " ");
    TITLE_TRAILING_PUNCT_RE
        .replace(collapsed.trim(), "")
        .trim()
        .to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
