//! Router assembly shared by the binary and the integration tests

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::middleware;
use crate::routes;
use crate::state::AppState;

/// Build the application router (without CORS, which depends on config)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::reputation_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}

async fn root() -> &'static str {
    "Chain Reputation API Server"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
