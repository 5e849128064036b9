//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::ReputationEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reputation_engine: Arc<ReputationEngine>,
}

impl AppState {
    pub fn new(reputation_engine: Arc<ReputationEngine>) -> Self {
        Self { reputation_engine }
    }
}

impl FromRef<AppState> for Arc<ReputationEngine> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.reputation_engine.clone()
    }
}
