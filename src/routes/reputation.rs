//! Reputation route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::reputation::{score_reputation, simulate_reputation, validate_addresses};
use crate::state::AppState;

pub fn reputation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/reputation/score", post(score_reputation))
        .route("/api/reputation/simulate", post(simulate_reputation))
        .route("/api/reputation/validate", get(validate_addresses))
}
