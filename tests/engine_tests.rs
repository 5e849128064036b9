//! Reputation Engine Tests
//!
//! Exercises the async parts of the engine: concurrent chain fetches through
//! mock sources and the narrator fallback behavior.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use chain_reputation::error::ApiError;
use chain_reputation::models::{PolkadotMetrics, ReputationProfile, StellarMetrics, SummarySource};
use chain_reputation::services::narrator::{InsightNarrator, NarrationContext, NarratorError};
use chain_reputation::services::reputation::{PolkadotSource, SourceError, StellarSource};
use chain_reputation::services::{InsightEngine, ReputationEngine};

// ============================================================================
// Mock Collaborators
// ============================================================================

struct FixedStellar(StellarMetrics);

#[async_trait]
impl StellarSource for FixedStellar {
    async fn fetch_stellar(&self, address: &str) -> Result<StellarMetrics, SourceError> {
        Ok(StellarMetrics {
            address: address.to_string(),
            ..self.0.clone()
        })
    }
}

struct FixedPolkadot(PolkadotMetrics);

#[async_trait]
impl PolkadotSource for FixedPolkadot {
    async fn fetch_polkadot(&self, address: &str) -> Result<PolkadotMetrics, SourceError> {
        Ok(PolkadotMetrics {
            address: address.to_string(),
            ..self.0.clone()
        })
    }
}

/// Both fetches wait on the same barrier, so a sequential scan would hang
struct Rendezvous(Arc<Barrier>);

#[async_trait]
impl StellarSource for Rendezvous {
    async fn fetch_stellar(&self, address: &str) -> Result<StellarMetrics, SourceError> {
        self.0.wait().await;
        Ok(StellarMetrics {
            address: address.to_string(),
            transaction_count: 150,
            ..Default::default()
        })
    }
}

#[async_trait]
impl PolkadotSource for Rendezvous {
    async fn fetch_polkadot(&self, address: &str) -> Result<PolkadotMetrics, SourceError> {
        self.0.wait().await;
        Ok(PolkadotMetrics {
            address: address.to_string(),
            governance_votes: 8,
            ..Default::default()
        })
    }
}

struct FailingPolkadot(fn() -> SourceError);

#[async_trait]
impl PolkadotSource for FailingPolkadot {
    async fn fetch_polkadot(&self, _address: &str) -> Result<PolkadotMetrics, SourceError> {
        Err((self.0)())
    }
}

enum NarratorBehavior {
    Reply(&'static str),
    Fail,
    Hang,
}

struct MockNarrator(NarratorBehavior);

#[async_trait]
impl InsightNarrator for MockNarrator {
    async fn narrate(&self, _context: &NarrationContext) -> Result<String, NarratorError> {
        match &self.0 {
            NarratorBehavior::Reply(text) => Ok(text.to_string()),
            NarratorBehavior::Fail => Err(NarratorError::Status(503)),
            NarratorBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }
}

fn narrated_engine(behavior: NarratorBehavior) -> ReputationEngine {
    ReputationEngine::new(InsightEngine::with_narrator(
        Arc::new(MockNarrator(behavior)),
        Duration::from_millis(50),
    ))
}

fn active_stellar() -> StellarMetrics {
    StellarMetrics {
        address: "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7".to_string(),
        transaction_count: 400,
        total_volume: 25_000.0,
        payment_count: 120,
        account_age: 500,
        asset_diversity: 6,
        liquidity_provided: 0.0,
    }
}

fn active_polkadot() -> PolkadotMetrics {
    PolkadotMetrics {
        address: "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5".to_string(),
        governance_votes: 6,
        staking_amount: 300.0,
        staking_duration: 120,
        validator_nominations: 4,
        parachain_interactions: 12,
        account_age: 300,
        identity_verified: false,
    }
}

// ============================================================================
// Record Assembly Tests
// ============================================================================

#[tokio::test]
async fn test_record_overall_is_sum_of_chain_scores() {
    let engine = ReputationEngine::default();
    let record = engine.build_record(active_stellar(), active_polkadot()).await;

    assert_eq!(
        record.overall_score,
        record.stellar.score + record.polkadot.score
    );
    assert_eq!(record.profile, record.ai_insights.profile);
    assert_eq!(record.ai_insights.summary_source, SummarySource::Template);
}

#[tokio::test]
async fn test_record_serializes_with_camel_case_fields() {
    let engine = ReputationEngine::default();
    let record = engine.build_record(active_stellar(), active_polkadot()).await;

    let json = serde_json::to_value(&record).unwrap();
    assert!(json["overallScore"].is_u64());
    assert!(json["timestamp"].is_i64());
    assert_eq!(json["stellar"]["transactionCount"], 400);
    assert!(json["stellar"]["score"].is_u64());
    assert!(json["breakdown"]["governanceParticipation"].is_u64());
    assert!(json["aiInsights"]["redFlags"].is_array());
}

// ============================================================================
// Scan Tests
// ============================================================================

#[tokio::test]
async fn test_scan_fetches_both_chains_concurrently() {
    let barrier = Arc::new(Barrier::new(2));
    let stellar = Rendezvous(barrier.clone());
    let polkadot = Rendezvous(barrier);
    let engine = ReputationEngine::default();

    let record = tokio::time::timeout(
        Duration::from_secs(5),
        engine.scan(&stellar, &polkadot, "GSTELLAR", "1POLKADOT"),
    )
    .await
    .expect("scan should not serialize the fetches")
    .unwrap();

    assert_eq!(record.stellar.metrics.address, "GSTELLAR");
    assert_eq!(record.polkadot.metrics.address, "1POLKADOT");
    assert_eq!(record.stellar.score, 15);
    assert_eq!(record.polkadot.score, 80);
}

#[tokio::test]
async fn test_scan_uses_fetched_metrics() {
    let engine = ReputationEngine::default();
    let record = engine
        .scan(
            &FixedStellar(active_stellar()),
            &FixedPolkadot(active_polkadot()),
            "GADDR",
            "1ADDR",
        )
        .await
        .unwrap();

    let direct = engine.build_record(active_stellar(), active_polkadot()).await;
    assert_eq!(record.overall_score, direct.overall_score);
    assert_eq!(record.breakdown, direct.breakdown);
    assert_eq!(record.stellar.metrics.address, "GADDR");
}

#[tokio::test]
async fn test_scan_unavailable_chain_is_bad_gateway() {
    let engine = ReputationEngine::default();
    let result = engine
        .scan(
            &FixedStellar(active_stellar()),
            &FailingPolkadot(|| SourceError::Unavailable("subscan down".to_string())),
            "GADDR",
            "1ADDR",
        )
        .await;

    assert!(matches!(result, Err(ApiError::ExternalServiceError(_))));
}

#[tokio::test]
async fn test_scan_source_timeout_is_gateway_timeout() {
    let engine = ReputationEngine::default();
    let result = engine
        .scan(
            &FixedStellar(active_stellar()),
            &FailingPolkadot(|| SourceError::Timeout("subscan".to_string())),
            "GADDR",
            "1ADDR",
        )
        .await;

    assert!(matches!(result, Err(ApiError::Timeout(_))));
}

// ============================================================================
// Narrator Tests
// ============================================================================

#[tokio::test]
async fn test_narrator_summary_replaces_template() {
    let engine = narrated_engine(NarratorBehavior::Reply("  A steady cross-chain participant.  "));
    let record = engine.build_record(active_stellar(), active_polkadot()).await;

    assert_eq!(record.ai_insights.summary, "A steady cross-chain participant.");
    assert_eq!(record.ai_insights.summary_source, SummarySource::Narrator);
}

#[tokio::test]
async fn test_narrator_failure_falls_back_to_template() {
    let baseline = ReputationEngine::default()
        .build_record(active_stellar(), active_polkadot())
        .await;
    let record = narrated_engine(NarratorBehavior::Fail)
        .build_record(active_stellar(), active_polkadot())
        .await;

    assert_eq!(record.ai_insights.summary_source, SummarySource::Template);
    assert_eq!(record.ai_insights.summary, baseline.ai_insights.summary);
}

#[tokio::test]
async fn test_narrator_timeout_falls_back_to_template() {
    let record = tokio::time::timeout(
        Duration::from_secs(5),
        narrated_engine(NarratorBehavior::Hang).build_record(active_stellar(), active_polkadot()),
    )
    .await
    .expect("narrator deadline should cut the call short");

    assert_eq!(record.ai_insights.summary_source, SummarySource::Template);
    assert!(!record.ai_insights.summary.is_empty());
}

#[tokio::test]
async fn test_empty_narration_falls_back_to_template() {
    let record = narrated_engine(NarratorBehavior::Reply("   "))
        .build_record(active_stellar(), active_polkadot())
        .await;

    assert_eq!(record.ai_insights.summary_source, SummarySource::Template);
}

#[tokio::test]
async fn test_narrator_never_changes_structured_insights() {
    let baseline = ReputationEngine::default()
        .build_record(active_stellar(), active_polkadot())
        .await;
    let narrated = narrated_engine(NarratorBehavior::Reply("Rewritten."))
        .build_record(active_stellar(), active_polkadot())
        .await;

    assert_eq!(narrated.ai_insights.profile, baseline.ai_insights.profile);
    assert_eq!(narrated.ai_insights.confidence, baseline.ai_insights.confidence);
    assert_eq!(narrated.ai_insights.strengths, baseline.ai_insights.strengths);
    assert_eq!(
        narrated.ai_insights.recommendations,
        baseline.ai_insights.recommendations
    );
    assert_eq!(narrated.ai_insights.red_flags, baseline.ai_insights.red_flags);
    assert_ne!(narrated.ai_insights.profile, ReputationProfile::Newcomer);
}
