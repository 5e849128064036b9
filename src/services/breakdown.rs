//! Cross-chain score breakdown
//!
//! Re-buckets the raw metrics of both chains into six explanatory categories.
//! The breakdown is computed from the metrics directly and does not reuse the
//! per-chain scorer components, so its totals need not match the sub-scores.

use crate::models::{
    BreakdownCategory, PolkadotActivity, PolkadotMetrics, ScoreBreakdown, StellarActivity,
    StellarMetrics,
};
use crate::services::scoring::{log_points, multiplied_points, per_unit_points};

/// Build the breakdown for two scored activities
pub fn calculate_score_breakdown(
    stellar: &StellarActivity,
    polkadot: &PolkadotActivity,
) -> ScoreBreakdown {
    breakdown_from_metrics(&stellar.metrics, &polkadot.metrics)
}

/// Same as [`calculate_score_breakdown`], straight from unscored metrics
pub fn breakdown_from_metrics(stellar: &StellarMetrics, polkadot: &PolkadotMetrics) -> ScoreBreakdown {
    ScoreBreakdown {
        transaction_consistency: transaction_consistency(stellar),
        governance_participation: governance_participation(polkadot),
        staking_behavior: staking_behavior(polkadot),
        liquidity_provision: liquidity_provision(stellar),
        account_age: account_age(stellar, polkadot),
        asset_diversity: asset_diversity(stellar),
    }
}

fn capped(category: BreakdownCategory, value: u32) -> u32 {
    value.min(category.max())
}

/// Transactions and payments at the Stellar scorer's ratios, each half capped at 100
fn transaction_consistency(stellar: &StellarMetrics) -> u32 {
    let transactions = per_unit_points(stellar.transaction_count, 10, 100);
    let payments = per_unit_points(stellar.payment_count, 5, 100);
    capped(
        BreakdownCategory::TransactionConsistency,
        transactions + payments,
    )
}

fn governance_participation(polkadot: &PolkadotMetrics) -> u32 {
    let votes = multiplied_points(polkadot.governance_votes, 10, 200);
    let identity = if polkadot.identity_verified { 50 } else { 0 };
    capped(BreakdownCategory::GovernanceParticipation, votes + identity)
}

fn staking_behavior(polkadot: &PolkadotMetrics) -> u32 {
    let amount = log_points(polkadot.staking_amount, 20.0, 100);
    let duration = per_unit_points(polkadot.staking_duration, 7, 60);
    let nominations = multiplied_points(polkadot.validator_nominations, 10, 40);
    capped(
        BreakdownCategory::StakingBehavior,
        amount + duration + nominations,
    )
}

fn liquidity_provision(stellar: &StellarMetrics) -> u32 {
    let max = BreakdownCategory::LiquidityProvision.max();
    capped(
        BreakdownCategory::LiquidityProvision,
        log_points(stellar.liquidity_provided, 25.0, max),
    )
}

/// Older of the two accounts, one point per week
fn account_age(stellar: &StellarMetrics, polkadot: &PolkadotMetrics) -> u32 {
    let max = BreakdownCategory::AccountAge.max();
    let days = stellar.account_age.max(polkadot.account_age);
    capped(BreakdownCategory::AccountAge, per_unit_points(days, 7, max))
}

fn asset_diversity(stellar: &StellarMetrics) -> u32 {
    let max = BreakdownCategory::AssetDiversity.max();
    capped(
        BreakdownCategory::AssetDiversity,
        multiplied_points(stellar.asset_diversity, 10, max),
    )
}
