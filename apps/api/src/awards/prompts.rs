// Prompt text, response schema and tool definitions for the discovery strategies.
// Strategies share one research brief and differ only in the instructions around it.

use serde_json::json;

use crate::awards::models::{AwardRecord, PlayerIdentity};
use crate::llm_client::capabilities::{ResponseSchema, ToolDefinition};
use crate::llm_client::prompts::{
    JSON_ONLY_SYSTEM, TITLE_FIELD_INSTRUCTION, VERIFIABILITY_INSTRUCTION,
};

pub const AWARD_RESULTS_SCHEMA_NAME: &str = "award_results";
pub const SEARCH_AWARDS_TOOL: &str = "search_player_awards";
pub const CREATE_AWARD_TOOL: &str = "create_award_entry";

const RESEARCHER_PERSONA: &str = "You are an expert sports researcher with comprehensive \
knowledge of athlete awards and achievements. Your task is to find verifiable awards, \
achievements, and recognitions for athletes.";

const AWARD_TYPES: &str = "\
SEARCH COMPREHENSIVELY for:
- Player of the Week/Month/Year awards
- All-Conference, All-American, All-State selections
- Championship wins and trophies
- Post-season awards and honors
- Academic honors and scholar-athlete recognition
- Team captain and leadership awards
- Community service and volunteer recognition
- Rookie of the Year or newcomer awards
- Most Valuable Player (MVP) awards
- Defensive/Offensive Player of the Year
- Academic All-American selections
- Conference and national championships
- Bowl game awards, preseason honors and end-of-season awards";

const LISTING_FORMAT: &str = "\
For each award you find, provide ONLY the award information in this exact order, one item per line:
[Award Name]
[Short description of when it was won and how it relates to the player]
[Year received]
[Organization that gave the award]
[Category: sports, academic, personal, or professional]
[Significance: local, regional, national, or international]
[Source URL if available]
Leave a blank line between awards. Do NOT add field labels or extra commentary.";

const STRUCTURED_SOURCING: &str = "\
You MUST:
1. Search reliable sources: official team sites, league sites, NCAA, ESPN, sports-reference.com, school athletic sites
2. Only return awards you can verify with a working source URL
3. Cross-reference information across sources when possible
4. Prefer official team sites over league sites over major sports news over sports databases
Only include an image_url when you find a direct image link on the source site.";

/// Shared research brief naming the player.
pub fn research_subject(player: &PlayerIdentity) -> String {
    let mut brief = format!(
        "Research awards and achievements for: {}\nSport: {}",
        player.player_name, player.sport
    );
    if let Some(college) = &player.college {
        brief.push_str(&format!("\nCollege/University: {college}"));
    }
    if let Some(team) = &player.team {
        brief.push_str(&format!("\nProfessional team(s): {team}"));
    }
    brief.push_str("\nSearch for awards from every team and school the player has been part of.");
    brief
}

// ── Structured ──────────────────────────────────────────────────────────────

pub fn structured_system() -> String {
    format!(
        "You are an expert sports research analyst with access to comprehensive sports \
databases and news archives. Your task is to find VERIFIED, REAL awards with reliable sources.\n\n\
{STRUCTURED_SOURCING}\n\n{TITLE_FIELD_INSTRUCTION}\n\n{VERIFIABILITY_INSTRUCTION}\n\n{JSON_ONLY_SYSTEM}"
    )
}

pub fn structured_user(player: &PlayerIdentity) -> String {
    format!(
        "{}\n\n{AWARD_TYPES}\n\n\
Example of GOOD output:\n\
{{\"name\": \"First-Team All-Pac-10\", \"description\": \"Selected to the First-Team All-Pac-10 \
for exceptional defensive performance during the 2008 season\", \"organization\": \"Pac-10 \
Conference\", \"year\": 2008, \"source_url\": \"https://calbears.com/sports/football\", \
\"category\": \"sports\", \"significance\": \"regional\"}}\n\n\
Return only verified awards with sources. Quality over quantity.",
        research_subject(player)
    )
}

/// Object schema for the structured strategy's answer.
///
/// Strict mode: every property is listed in `required`, optional ones are nullable,
/// and length bounds are left to the normalizer.
pub fn award_results_schema() -> ResponseSchema {
    ResponseSchema {
        name: AWARD_RESULTS_SCHEMA_NAME.to_string(),
        strict: true,
        schema: json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["player_name", "awards", "notes"],
            "properties": {
                "player_name": { "type": "string" },
                "notes": { "type": ["string", "null"] },
                "awards": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": [
                            "name", "description", "organization", "source_url",
                            "date", "year", "category", "significance", "image_url"
                        ],
                        "properties": {
                            "name": {
                                "type": "string",
                                "description": "Official award title ONLY, e.g. 'First-Team All-American' or 'AFC Defensive Player of the Week'. Never a sentence."
                            },
                            "description": {
                                "type": "string",
                                "description": "When the award was won and why, as one to three sentences."
                            },
                            "organization": {
                                "type": "string",
                                "description": "Organization that issued the award."
                            },
                            "source_url": {
                                "type": "string",
                                "description": "Direct http(s) URL to an official source verifying this award."
                            },
                            "date": { "type": ["string", "null"] },
                            "year": { "type": ["integer", "null"] },
                            "category": {
                                "type": ["string", "null"],
                                "enum": ["sports", "academic", "personal", "professional", null]
                            },
                            "significance": {
                                "type": ["string", "null"],
                                "enum": ["local", "regional", "national", "international", null]
                            },
                            "image_url": {
                                "type": ["string", "null"],
                                "description": "Direct image link from the source site, or null."
                            }
                        }
                    }
                }
            }
        }),
    }
}

// ── Free-text and conversational ────────────────────────────────────────────

pub fn free_text_system() -> String {
    format!("{RESEARCHER_PERSONA}\n\n{LISTING_FORMAT}\n\n{AWARD_TYPES}\n\n{VERIFIABILITY_INSTRUCTION}")
}

pub fn free_text_user(player: &PlayerIdentity) -> String {
    format!(
        "{}\n\nPlease research and find athletic awards and honors, academic achievements, \
community service recognition, leadership awards, championship wins and all-conference or \
all-american selections.\n\nProvide a comprehensive list with details for each award found.",
        research_subject(player)
    )
}

/// The single message posted into a conversational session. The persona
/// carries its own instructions, so the message holds the brief and format.
pub fn conversational_message(player: &PlayerIdentity) -> String {
    format!(
        "{}\n\nPlease use web search to find athletic awards and honors, academic achievements, \
community service recognition, leadership awards, championship wins and all-conference or \
all-american selections.\n\n\
For each award, answer with labeled lines:\n\
Name: ...\nDescription: ...\nYear: ...\nOrganization: ...\nCategory: ...\nSignificance: ...\nSource: ...",
        research_subject(player)
    )
}

/// Trophy artwork prompt for one award.
pub fn award_image_prompt(award: &AwardRecord) -> String {
    format!(
        "Professional award trophy or medal representing: {}.\n\
Award details: {}\nOrganization: {}\nYear: {}\n\
Style: clean, modern trophy design with metallic finish, suitable for a sports achievement display. \
High quality, professional appearance with subtle lighting. Avoid text or words on the trophy itself.",
        award.name, award.description, award.organization, award.year
    )
}

/// Short prompt for the thumbnail of an award that arrived without an image.
pub fn award_thumbnail_prompt(award: &AwardRecord) -> String {
    format!(
        "A professional award trophy or medal representing: {} - {}. \
Clean, modern design with metallic finish, suitable for a sports achievement display.",
        award.name, award.description
    )
}

// ── Tool calling ────────────────────────────────────────────────────────────

pub fn tool_calling_system() -> String {
    format!(
        "{RESEARCHER_PERSONA}\n\n{AWARD_TYPES}\n\n\
Use the provided functions to search for and create award entries. Be thorough but accurate."
    )
}

pub fn tool_calling_user(player: &PlayerIdentity) -> String {
    format!(
        "{}\n\nPlease search for and create entries for all awards you find.",
        research_subject(player)
    )
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: SEARCH_AWARDS_TOOL.to_string(),
            description: "Search for awards and achievements for a specific player".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "player_name": { "type": "string", "description": "The name of the player to search for" },
                    "sport": { "type": "string", "description": "The sport the player plays" },
                    "college": { "type": "string", "description": "The college/university the player attended" },
                    "team": { "type": "string", "description": "The professional team the player played for" },
                    "award_types": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Types of awards to search for"
                    }
                },
                "required": ["player_name", "sport"]
            }),
        },
        ToolDefinition {
            name: CREATE_AWARD_TOOL.to_string(),
            description: "Create an award entry for a discovered award".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The name of the award" },
                    "description": { "type": "string", "description": "Description of what the award is for" },
                    "category": {
                        "type": "string",
                        "enum": ["sports", "academic", "personal", "professional"],
                        "description": "The category of the award"
                    },
                    "year": { "type": "number", "description": "The year the award was received" },
                    "organization": { "type": "string", "description": "The organization that gave the award" },
                    "significance": {
                        "type": "string",
                        "enum": ["local", "regional", "national", "international"],
                        "description": "The significance level of the award"
                    },
                    "source_url": { "type": "string", "description": "URL source for verification" }
                },
                "required": ["name", "description", "category", "year", "organization", "significance"]
            }),
        },
    ]
}
