pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::awards::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Awards API
        .route(
            "/api/v1/players/:player_id/awards",
            get(handlers::handle_list_awards),
        )
        .route(
            "/api/v1/players/:player_id/awards/discover",
            post(handlers::handle_discover),
        )
        .route("/api/v1/awards/verify", post(handlers::handle_verify))
        .with_state(state)
}
