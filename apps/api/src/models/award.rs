use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlayerAwardRow {
    pub id: Uuid,
    pub player_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub year: i32,
    pub organization: String,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub significance: String,
    pub verified: bool,
    pub needs_review: bool,
    pub ai_discovered: bool,
    pub confidence_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}
