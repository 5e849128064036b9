//! Reputation scoring API handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::addresses::{
    is_valid_polkadot_address, is_valid_stellar_address, validate_polkadot_address,
    validate_stellar_address,
};
use crate::error::ApiResult;
use crate::models::{
    AddressCheck, ApiResponse, ReputationRecord, ScoreRequest, SimulateRequest, ValidateQuery,
    ValidateResponse,
};
use crate::services::reputation::{ReputationEngine, SimulationResult};

/// POST /api/reputation/score - Score already-fetched activity from both chains
pub async fn score_reputation(
    State(engine): State<Arc<ReputationEngine>>,
    Json(request): Json<ScoreRequest>,
) -> ApiResult<Json<ApiResponse<ReputationRecord>>> {
    request.validate()?;
    validate_stellar_address(&request.stellar.address)?;
    validate_polkadot_address(&request.polkadot.address)?;

    let record = engine.build_record(request.stellar, request.polkadot).await;

    Ok(Json(ApiResponse::ok(record)))
}

/// POST /api/reputation/simulate - Project the score impact of a scenario
pub async fn simulate_reputation(
    State(engine): State<Arc<ReputationEngine>>,
    Json(request): Json<SimulateRequest>,
) -> ApiResult<Json<ApiResponse<SimulationResult>>> {
    request.validate()?;

    let result = engine.simulate(request.stellar, request.polkadot, &request.scenario)?;

    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/reputation/validate - Check address formats without scoring
pub async fn validate_addresses(
    Query(query): Query<ValidateQuery>,
) -> Json<ApiResponse<ValidateResponse>> {
    let check = |address: Option<&str>, is_valid: fn(&str) -> bool| AddressCheck {
        provided: address.is_some_and(|a| !a.is_empty()),
        valid: address.is_some_and(is_valid),
    };

    let stellar = check(query.stellar_address.as_deref(), is_valid_stellar_address);
    let polkadot = check(query.polkadot_address.as_deref(), is_valid_polkadot_address);
    let can_scan = stellar.valid && polkadot.valid;

    Json(ApiResponse::ok(ValidateResponse {
        stellar,
        polkadot,
        can_scan,
    }))
}
