//! Reputation engine: assembles a full record from both chains' metrics
//!
//! Chain data arrives through [`StellarSource`] / [`PolkadotSource`]
//! collaborators. The engine fetches both concurrently, then runs the pure
//! scoring, breakdown and insight steps.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ApiError;
use crate::models::{
    finite_non_negative, PolkadotActivity, PolkadotMetrics, ReputationProfile, ReputationRecord,
    ScoreBreakdown, ScoreTier, StellarActivity, StellarMetrics,
};
use crate::services::breakdown::calculate_score_breakdown;
use crate::services::insights::{classify_profile, generate_rule_based_insights, InsightEngine};
use crate::services::scoring::calculate_overall_score;

// ============================================================================
// Activity Sources
// ============================================================================

/// Errors reported by chain data fetchers
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Chain data unavailable: {0}")]
    Unavailable(String),

    #[error("Chain data request timed out: {0}")]
    Timeout(String),
}

/// Fetches Stellar activity metrics for an address
#[async_trait::async_trait]
pub trait StellarSource: Send + Sync {
    async fn fetch_stellar(&self, address: &str) -> Result<StellarMetrics, SourceError>;
}

/// Fetches Polkadot activity metrics for an address
#[async_trait::async_trait]
pub trait PolkadotSource: Send + Sync {
    async fn fetch_polkadot(&self, address: &str) -> Result<PolkadotMetrics, SourceError>;
}

// ============================================================================
// Snapshot
// ============================================================================

/// The numeric part of a record, computed synchronously
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSnapshot {
    pub stellar: StellarActivity,
    pub polkadot: PolkadotActivity,
    pub overall_score: u32,
    pub breakdown: ScoreBreakdown,
}

impl ScoreSnapshot {
    pub fn from_metrics(stellar: StellarMetrics, polkadot: PolkadotMetrics) -> Self {
        let stellar = StellarActivity::from_metrics(stellar);
        let polkadot = PolkadotActivity::from_metrics(polkadot);
        let overall_score = calculate_overall_score(stellar.score, polkadot.score);
        let breakdown = calculate_score_breakdown(&stellar, &polkadot);

        Self {
            stellar,
            polkadot,
            overall_score,
            breakdown,
        }
    }

    /// Profile from the deterministic classifier
    pub fn profile(&self) -> ReputationProfile {
        classify_profile(
            &self.stellar.metrics,
            &self.polkadot.metrics,
            self.overall_score,
            &self.breakdown,
        )
        .profile
    }
}

// ============================================================================
// Reputation Engine
// ============================================================================

/// Reputation engine service
#[derive(Clone, Default)]
pub struct ReputationEngine {
    insights: InsightEngine,
}

impl ReputationEngine {
    pub fn new(insights: InsightEngine) -> Self {
        Self { insights }
    }

    /// Build a record from metrics that were already fetched
    pub async fn build_record(
        &self,
        stellar: StellarMetrics,
        polkadot: PolkadotMetrics,
    ) -> ReputationRecord {
        let snapshot = ScoreSnapshot::from_metrics(stellar, polkadot);

        let ai_insights = self
            .insights
            .generate(
                &snapshot.stellar,
                &snapshot.polkadot,
                snapshot.overall_score,
                &snapshot.breakdown,
            )
            .await;

        tracing::info!(
            stellar = %snapshot.stellar.metrics.address,
            polkadot = %snapshot.polkadot.metrics.address,
            stellar_score = snapshot.stellar.score,
            polkadot_score = snapshot.polkadot.score,
            overall_score = snapshot.overall_score,
            profile = %ai_insights.profile,
            confidence = ai_insights.confidence,
            "Reputation record built"
        );

        ReputationRecord {
            overall_score: snapshot.overall_score,
            profile: ai_insights.profile,
            tier: ScoreTier::from_score(snapshot.overall_score),
            stellar: snapshot.stellar,
            polkadot: snapshot.polkadot,
            breakdown: snapshot.breakdown,
            ai_insights,
            timestamp: Utc::now(),
        }
    }

    /// Fetch both chains concurrently, then build the record.
    ///
    /// A failed fetch aborts the scan before any scoring runs.
    pub async fn scan(
        &self,
        stellar_source: &dyn StellarSource,
        polkadot_source: &dyn PolkadotSource,
        stellar_address: &str,
        polkadot_address: &str,
    ) -> Result<ReputationRecord, ApiError> {
        tracing::info!(
            stellar = %stellar_address,
            polkadot = %polkadot_address,
            "Starting scan"
        );

        let (stellar, polkadot) = tokio::try_join!(
            stellar_source.fetch_stellar(stellar_address),
            polkadot_source.fetch_polkadot(polkadot_address),
        )
        .map_err(|e| {
            tracing::warn!(error = %e, "Chain data fetch failed");
            ApiError::from(e)
        })?;

        Ok(self.build_record(stellar, polkadot).await)
    }

    /// Project the effect of a scenario on the current metrics
    pub fn simulate(
        &self,
        stellar: StellarMetrics,
        polkadot: PolkadotMetrics,
        scenario: &SimulationScenario,
    ) -> Result<SimulationResult, ApiError> {
        scenario.check()?;

        let current = ScoreSnapshot::from_metrics(stellar.clone(), polkadot.clone());

        let (projected_stellar, projected_polkadot) = scenario.apply(stellar, polkadot);
        let projected = ScoreSnapshot::from_metrics(projected_stellar, projected_polkadot);
        let projected_insights = generate_rule_based_insights(
            &projected.stellar,
            &projected.polkadot,
            projected.overall_score,
            &projected.breakdown,
        );

        Ok(SimulationResult {
            current_score: current.overall_score,
            projected_score: projected.overall_score,
            score_change: projected.overall_score as i64 - current.overall_score as i64,
            current_profile: current.profile(),
            projected_profile: projected_insights.profile,
            scenario_description: scenario.description(),
            recommendations: projected_insights.recommendations,
        })
    }
}

// ============================================================================
// Simulation Types
// ============================================================================

/// What-if scenarios applied on top of the current metrics
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationScenario {
    /// Cast additional governance votes
    CastGovernanceVotes { count: u64 },
    /// Bond additional DOT and keep the bond for `days`
    StakeDot { amount: f64, days: u64 },
    /// Nominate additional validators
    NominateValidators { count: u64 },
    /// Obtain a registrar judgement on the on-chain identity
    VerifyIdentity,
    /// Supply XLM to a liquidity pool
    ProvideLiquidity { amount: f64 },
    /// Additional Stellar payments and their volume
    SendPayments { count: u64, volume: f64 },
    /// Hold additional Stellar assets
    HoldAssets { count: u64 },
    /// Let both accounts age
    KeepAccountsActive { days: u64 },
}

impl SimulationScenario {
    pub fn description(&self) -> String {
        match self {
            SimulationScenario::CastGovernanceVotes { count } => {
                format!("Cast {} governance votes", count)
            }
            SimulationScenario::StakeDot { amount, days } => {
                format!("Stake {} DOT for {} days", amount, days)
            }
            SimulationScenario::NominateValidators { count } => {
                format!("Nominate {} more validators", count)
            }
            SimulationScenario::VerifyIdentity => "Verify on-chain identity".to_string(),
            SimulationScenario::ProvideLiquidity { amount } => {
                format!("Provide {} XLM of liquidity", amount)
            }
            SimulationScenario::SendPayments { count, volume } => {
                format!("Send {} payments totalling {} XLM", count, volume)
            }
            SimulationScenario::HoldAssets { count } => {
                format!("Hold {} more Stellar assets", count)
            }
            SimulationScenario::KeepAccountsActive { days } => {
                format!("Keep both accounts active for {} more days", days)
            }
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        let amount = match self {
            SimulationScenario::StakeDot { amount, .. }
            | SimulationScenario::ProvideLiquidity { amount } => *amount,
            SimulationScenario::SendPayments { volume, .. } => *volume,
            _ => return Ok(()),
        };

        finite_non_negative(amount).map_err(|_| {
            ApiError::ValidationError(format!(
                "scenario amount must be a non-negative number, got {}",
                amount
            ))
        })
    }

    fn apply(
        &self,
        mut stellar: StellarMetrics,
        mut polkadot: PolkadotMetrics,
    ) -> (StellarMetrics, PolkadotMetrics) {
        match self {
            SimulationScenario::CastGovernanceVotes { count } => {
                polkadot.governance_votes = polkadot.governance_votes.saturating_add(*count);
            }
            SimulationScenario::StakeDot { amount, days } => {
                polkadot.staking_amount += amount;
                polkadot.staking_duration = polkadot.staking_duration.saturating_add(*days);
            }
            SimulationScenario::NominateValidators { count } => {
                polkadot.validator_nominations =
                    polkadot.validator_nominations.saturating_add(*count);
            }
            SimulationScenario::VerifyIdentity => {
                polkadot.identity_verified = true;
            }
            SimulationScenario::ProvideLiquidity { amount } => {
                stellar.liquidity_provided += amount;
            }
            SimulationScenario::SendPayments { count, volume } => {
                stellar.payment_count = stellar.payment_count.saturating_add(*count);
                stellar.transaction_count = stellar.transaction_count.saturating_add(*count);
                stellar.total_volume += volume;
            }
            SimulationScenario::HoldAssets { count } => {
                stellar.asset_diversity = stellar.asset_diversity.saturating_add(*count);
            }
            SimulationScenario::KeepAccountsActive { days } => {
                stellar.account_age = stellar.account_age.saturating_add(*days);
                polkadot.account_age = polkadot.account_age.saturating_add(*days);
                if polkadot.staking_amount > 0.0 {
                    polkadot.staking_duration = polkadot.staking_duration.saturating_add(*days);
                }
            }
        }
        (stellar, polkadot)
    }
}

/// Result of a score simulation
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub current_score: u32,
    pub projected_score: u32,
    pub score_change: i64,
    pub current_profile: ReputationProfile,
    pub projected_profile: ReputationProfile,
    pub scenario_description: String,
    pub recommendations: Vec<String>,
}
