//! Persistence Adapter for discovered awards.

use async_trait::async_trait;
use sqlx::{Error, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::awards::models::DiscoveryResult;
use crate::models::award::PlayerAwardRow;

#[async_trait]
pub trait AwardStore: Send + Sync {
    /// Inserts each award keyed by `(player_id, name, year)`. Existing rows are
    /// neither overwritten nor duplicated; only newly inserted rows are returned.
    async fn save_discovered(
        &self,
        player_id: Uuid,
        result: &DiscoveryResult,
    ) -> Result<Vec<PlayerAwardRow>, Error>;

    /// A player's awards, newest year first.
    async fn list_for_player(&self, player_id: Uuid) -> Result<Vec<PlayerAwardRow>, Error>;
}

#[derive(Clone)]
pub struct PgAwardStore {
    pool: PgPool,
}

impl PgAwardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AwardStore for PgAwardStore {
    async fn save_discovered(
        &self,
        player_id: Uuid,
        result: &DiscoveryResult,
    ) -> Result<Vec<PlayerAwardRow>, Error> {
        let mut saved = Vec::with_capacity(result.awards.len());

        for award in &result.awards {
            let row: Option<PlayerAwardRow> = sqlx::query_as(
                r#"
                INSERT INTO player_awards
                    (id, player_id, name, description, category, year, organization,
                     image_url, source_url, significance, verified, needs_review,
                     ai_discovered, confidence_score)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, TRUE, $13)
                ON CONFLICT (player_id, name, year) DO NOTHING
                RETURNING *
                "#,
            )
            .bind(award.id)
            .bind(player_id)
            .bind(&award.name)
            .bind(&award.description)
            .bind(award.category.as_str())
            .bind(award.year)
            .bind(&award.organization)
            .bind(&award.image_url)
            .bind(&award.source_url)
            .bind(award.significance.as_str())
            .bind(award.verified)
            .bind(!award.verified)
            .bind(result.confidence_score)
            .fetch_optional(&self.pool)
            .await?;

            match row {
                Some(row) => saved.push(row),
                None => info!(
                    "Award already exists for player {player_id}: {} ({})",
                    award.name, award.year
                ),
            }
        }

        info!(
            "Saved {} of {} discovered awards for player {player_id}",
            saved.len(),
            result.awards.len()
        );
        Ok(saved)
    }

    async fn list_for_player(&self, player_id: Uuid) -> Result<Vec<PlayerAwardRow>, Error> {
        let rows = sqlx::query_as(
            "SELECT * FROM player_awards WHERE player_id = $1 ORDER BY year DESC, created_at DESC",
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
