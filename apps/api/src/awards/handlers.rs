use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::awards::models::{DiscoveryResult, PlayerIdentity};
use crate::awards::orchestrator::StrategyFailure;
use crate::awards::strategies::StrategyKind;
use crate::awards::thumbnails::attach_missing_thumbnails;
use crate::awards::verify::{verify_award, AwardClaim};
use crate::errors::AppError;
use crate::models::award::PlayerAwardRow;
use crate::state::AppState;

fn default_sport() -> String {
    "Football".to_string()
}

#[derive(Debug, Deserialize)]
pub struct DiscoverRequest {
    pub player_name: String,
    #[serde(default = "default_sport")]
    pub sport: String,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

impl DiscoverRequest {
    /// Blank optional fields are treated as unknown.
    pub fn into_identity(self) -> Result<PlayerIdentity, AppError> {
        let player_name = self.player_name.trim().to_string();
        if player_name.is_empty() {
            return Err(AppError::Validation("player_name is required".to_string()));
        }
        let sport = match self.sport.trim() {
            "" => default_sport(),
            s => s.to_string(),
        };
        let present = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        Ok(PlayerIdentity {
            player_name,
            sport,
            college: present(self.college),
            team: present(self.team),
        })
    }
}

#[derive(Serialize)]
pub struct DiscoverResponse {
    pub success: bool,
    /// Rows inserted by this run; awards already on file are not repeated.
    pub awards: Vec<PlayerAwardRow>,
    pub discovery_result: DiscoveryResult,
    pub strategy: StrategyKind,
    pub failures: Vec<StrategyFailure>,
}

#[derive(Serialize)]
pub struct AwardListResponse {
    pub awards: Vec<PlayerAwardRow>,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

/// POST /api/v1/players/:player_id/awards/discover
pub async fn handle_discover(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
    Json(req): Json<DiscoverRequest>,
) -> Result<Json<DiscoverResponse>, AppError> {
    let player = req.into_identity()?;
    let cancel = state.shutdown.child_token();

    let outcome = state.orchestrator.discover(&player, &cancel).await?;
    let mut result = outcome.result;
    attach_missing_thumbnails(state.llm.as_ref(), &mut result.awards).await;

    let awards = state.awards.save_discovered(player_id, &result).await?;

    Ok(Json(DiscoverResponse {
        success: true,
        awards,
        discovery_result: result,
        strategy: outcome.strategy,
        failures: outcome.failures,
    }))
}

/// GET /api/v1/players/:player_id/awards
pub async fn handle_list_awards(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<AwardListResponse>, AppError> {
    let awards = state.awards.list_for_player(player_id).await?;
    Ok(Json(AwardListResponse { awards }))
}

/// POST /api/v1/awards/verify
pub async fn handle_verify(
    State(state): State<AppState>,
    Json(claim): Json<AwardClaim>,
) -> Result<Json<VerifyResponse>, AppError> {
    if claim.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let verified = verify_award(state.llm.as_ref(), &claim).await;
    Ok(Json(VerifyResponse { verified }))
}
