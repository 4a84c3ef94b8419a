use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who to search for. `college` and `team` sharpen the prompts when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub player_name: String,
    pub sport: String,
    pub college: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Sports,
    Academic,
    Personal,
    Professional,
}

impl Category {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sports" => Some(Category::Sports),
            "academic" => Some(Category::Academic),
            "personal" => Some(Category::Personal),
            "professional" => Some(Category::Professional),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sports => "sports",
            Category::Academic => "academic",
            Category::Personal => "personal",
            Category::Professional => "professional",
        }
    }
}

/// Canonical reach of an award.
///
/// Strategies speak two vocabularies: `local|regional|national|international`
/// and `local|conference|national|professional`. Both map into this one enum
/// through `from_native`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Local,
    Regional,
    National,
    International,
}

/// Native vocabulary term → canonical significance.
const SIGNIFICANCE_MAPPING: &[(&str, Significance)] = &[
    ("local", Significance::Local),
    ("regional", Significance::Regional),
    ("conference", Significance::Regional),
    ("national", Significance::National),
    ("professional", Significance::National),
    ("international", Significance::International),
];

impl Significance {
    pub fn from_native(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        SIGNIFICANCE_MAPPING
            .iter()
            .find(|(term, _)| *term == value)
            .map(|(_, s)| *s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Significance::Local => "local",
            Significance::Regional => "regional",
            Significance::National => "national",
            Significance::International => "international",
        }
    }

    pub fn is_wide_reach(&self) -> bool {
        matches!(self, Significance::National | Significance::International)
    }
}

/// A year as the model sent it: a number, or text that may contain one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawYear {
    Number(i64),
    Decimal(f64),
    Text(String),
}

/// Unvalidated candidate straight out of a strategy. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub year: Option<RawYear>,
    /// Free-text date, consulted when `year` is absent.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub significance: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A candidate that passed required-field validation.
/// Fields the model did not supply stay `None` until a record is built.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardCandidate {
    pub name: String,
    pub description: String,
    pub organization: String,
    pub year: Option<i32>,
    pub category: Option<Category>,
    pub significance: Option<Significance>,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
}

impl From<AwardCandidate> for RawCandidate {
    fn from(c: AwardCandidate) -> Self {
        RawCandidate {
            name: Some(c.name),
            description: Some(c.description),
            organization: Some(c.organization),
            year: c.year.map(|y| RawYear::Number(y as i64)),
            date: None,
            category: c.category.map(|v| v.as_str().to_string()),
            significance: c.significance.map(|v| v.as_str().to_string()),
            source_url: c.source_url,
            image_url: c.image_url,
        }
    }
}

/// What a strategy assumes for fields the model left out.
#[derive(Debug, Clone, Copy)]
pub struct RecordDefaults {
    pub significance: Significance,
    pub verified: bool,
}

impl AwardCandidate {
    /// Fills defaults and assigns an id.
    pub fn into_record(self, defaults: RecordDefaults) -> AwardRecord {
        AwardRecord {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            category: self.category.unwrap_or_default(),
            year: self.year.unwrap_or_else(current_year),
            organization: self.organization,
            image_url: self.image_url,
            source_url: self.source_url,
            significance: self.significance.unwrap_or(defaults.significance),
            verified: defaults.verified,
        }
    }
}

/// A validated award as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub year: i32,
    pub organization: String,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub significance: Significance,
    /// Asserted by the strategy, not independently audited.
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub player_name: String,
    /// Discovery order.
    pub awards: Vec<AwardRecord>,
    /// Telemetry only.
    pub search_terms: Vec<String>,
    pub confidence_score: f64,
}

pub fn current_year() -> i32 {
    Utc::now().year()
}
