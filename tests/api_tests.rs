//! HTTP API Tests
//!
//! Drives the assembled router in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use chain_reputation::app;
use chain_reputation::services::ReputationEngine;
use chain_reputation::state::AppState;

const STELLAR_ADDRESS: &str = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
const POLKADOT_ADDRESS: &str = "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5";

fn test_router() -> Router {
    app::router(AppState::new(Arc::new(ReputationEngine::default())))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = test_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn score_body(stellar_address: &str, total_volume: f64) -> Value {
    json!({
        "stellar": {
            "address": stellar_address,
            "transactionCount": 320,
            "totalVolume": total_volume,
            "paymentCount": 90,
            "accountAge": 410,
            "assetDiversity": 5,
            "liquidityProvided": 0.0
        },
        "polkadot": {
            "address": POLKADOT_ADDRESS,
            "governanceVotes": 12,
            "stakingAmount": 150.0,
            "stakingDuration": 200,
            "validatorNominations": 3,
            "parachainInteractions": 8,
            "accountAge": 380,
            "identityVerified": true
        }
    })
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_issued_and_echoed() {
    let response = test_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

// ============================================================================
// Score Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_score_returns_full_record() {
    let (status, body) = send(post_json(
        "/api/reputation/score",
        score_body(STELLAR_ADDRESS, 8_000.0),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    let overall = data["overallScore"].as_u64().unwrap();
    let stellar = data["stellar"]["score"].as_u64().unwrap();
    let polkadot = data["polkadot"]["score"].as_u64().unwrap();
    assert_eq!(overall, stellar + polkadot);
    assert!(overall <= 1000);
    assert_eq!(data["aiInsights"]["summarySource"], "template");
    assert_eq!(data["profile"], data["aiInsights"]["profile"]);
}

#[tokio::test]
async fn test_score_rejects_bad_stellar_address() {
    let (status, body) = send(post_json(
        "/api/reputation/score",
        score_body("GNOTAREALADDRESS", 8_000.0),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_score_rejects_negative_amounts() {
    let (status, body) = send(post_json(
        "/api/reputation/score",
        score_body(STELLAR_ADDRESS, -1.0),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Simulate Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_simulate_identity_verification() {
    let mut body = score_body(STELLAR_ADDRESS, 8_000.0);
    body["polkadot"]["identityVerified"] = json!(false);
    body["scenario"] = json!({ "type": "verify_identity" });

    let (status, body) = send(post_json("/api/reputation/simulate", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["scoreChange"], 70);
    assert_eq!(body["data"]["scenarioDescription"], "Verify on-chain identity");
}

#[tokio::test]
async fn test_simulate_rejects_negative_scenario_amount() {
    let mut body = score_body(STELLAR_ADDRESS, 8_000.0);
    body["scenario"] = json!({ "type": "provide_liquidity", "amount": -10.0 });

    let (status, body) = send(post_json("/api/reputation/simulate", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Validate Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_validate_both_addresses() {
    let uri = format!(
        "/api/reputation/validate?stellarAddress={}&polkadotAddress={}",
        STELLAR_ADDRESS, POLKADOT_ADDRESS
    );
    let (status, body) = send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stellar"]["valid"], true);
    assert_eq!(body["data"]["polkadot"]["valid"], true);
    assert_eq!(body["data"]["canScan"], true);
}

#[tokio::test]
async fn test_validate_missing_address() {
    let uri = format!("/api/reputation/validate?stellarAddress={}", STELLAR_ADDRESS);
    let (status, body) = send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["polkadot"]["provided"], false);
    assert_eq!(body["data"]["canScan"], false);
}
