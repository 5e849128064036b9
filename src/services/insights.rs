//! Profile classification and insight generation
//!
//! Everything structured (profile, confidence, strengths, red flags,
//! recommendations) is derived deterministically from the numbers. An
//! optional [`InsightNarrator`] may rewrite the summary text, under a timeout,
//! and any narrator failure falls back to the templated summary.

use std::sync::Arc;
use std::time::Duration;

use crate::models::{
    AiInsights, BreakdownCategory, PolkadotActivity, PolkadotMetrics, ReputationProfile,
    ScoreBreakdown, ScoreTier, StellarActivity, StellarMetrics, SummarySource,
};
use crate::services::narrator::{InsightNarrator, NarrationContext, NarratorError};
use crate::services::scoring::{
    log_points, MAX_OVERALL_SCORE, POLKADOT_MAX_SCORE, STELLAR_MAX_SCORE,
};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Overall scores below this are classified as Newcomer
pub const NEWCOMER_SCORE_THRESHOLD: u32 = 100;

/// How far the top profile share must lead the runner-up to avoid Balanced
pub const DOMINANCE_MARGIN: f64 = 0.15;

/// Confidence floor, reached with no signal at all
const CONFIDENCE_BASE: f64 = 10.0;

/// Confidence earned from data coverage
const CONFIDENCE_COVERAGE_WEIGHT: f64 = 45.0;

/// Confidence earned from how clearly the profile was decided
const CONFIDENCE_CLARITY_WEIGHT: f64 = 45.0;

/// Growth rate of the coverage term per active metric
const COVERAGE_GROWTH_RATE: f64 = 0.35;

const MAX_CONFIDENCE: f64 = 99.0;

/// Volume points at which the Trader volume signal saturates (10^5 XLM)
const TRADER_VOLUME_CAP: u32 = 100;

// Rule thresholds
const ACTIVE_GOVERNANCE_VOTES: u64 = 5;
const LONG_TERM_STAKING_DAYS: u64 = 90;
const DIVERSIFIED_NOMINATIONS: u64 = 3;
const SUSTAINED_TRANSACTIONS: u64 = 100;
const REGULAR_PAYMENTS: u64 = 50;
const ESTABLISHED_ACCOUNT_DAYS: u64 = 365;
const NEW_ACCOUNT_DAYS: u64 = 30;
const DIVERSIFIED_ASSETS: u64 = 5;
const LOW_ASSET_DIVERSITY: u64 = 3;
const TOP_TIER_SCORE: u32 = 800;

// ============================================================================
// Classification
// ============================================================================

/// Profile decision plus the confidence in it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub profile: ReputationProfile,
    /// 0-100
    pub confidence: u8,
}

/// Pick a profile from the breakdown shares and score the confidence
pub fn classify_profile(
    stellar: &StellarMetrics,
    polkadot: &PolkadotMetrics,
    overall_score: u32,
    breakdown: &ScoreBreakdown,
) -> Classification {
    let mut shares = profile_shares(stellar, breakdown);
    // Stable sort keeps the enum order on ties
    shares.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (top_profile, top_share) = shares[0];
    let runner_up_share = shares[1].1;
    let gap = top_share - runner_up_share;

    let (profile, clarity) = if overall_score < NEWCOMER_SCORE_THRESHOLD {
        (ReputationProfile::Newcomer, 0.0)
    } else if gap > DOMINANCE_MARGIN {
        (top_profile, (gap / (2.0 * DOMINANCE_MARGIN)).min(1.0))
    } else {
        (ReputationProfile::Balanced, 0.25 * top_share)
    };

    let active = active_signal_count(stellar, polkadot);
    let confidence = calculate_confidence(active, clarity);

    Classification {
        profile,
        confidence,
    }
}

/// Normalized signal (0.0-1.0) behind each activity profile, in tie-break order.
///
/// Trader takes the stronger of transaction consistency and payment volume.
fn profile_shares(stellar: &StellarMetrics, breakdown: &ScoreBreakdown) -> [(ReputationProfile, f64); 4] {
    let volume_share = log_points(stellar.total_volume, 20.0, TRADER_VOLUME_CAP) as f64
        / TRADER_VOLUME_CAP as f64;
    let trading_share = breakdown
        .share(BreakdownCategory::TransactionConsistency)
        .max(volume_share);

    [
        (ReputationProfile::Trader, trading_share),
        (
            ReputationProfile::Governor,
            breakdown.share(BreakdownCategory::GovernanceParticipation),
        ),
        (
            ReputationProfile::Staker,
            breakdown.share(BreakdownCategory::StakingBehavior),
        ),
        (
            ReputationProfile::LiquidityProvider,
            breakdown.share(BreakdownCategory::LiquidityProvision),
        ),
    ]
}

/// Number of raw metrics that carry any signal (0-13)
fn active_signal_count(stellar: &StellarMetrics, polkadot: &PolkadotMetrics) -> u32 {
    let signals = [
        stellar.transaction_count > 0,
        stellar.total_volume > 0.0,
        stellar.payment_count > 0,
        stellar.account_age > 0,
        stellar.asset_diversity > 0,
        stellar.liquidity_provided > 0.0,
        polkadot.governance_votes > 0,
        polkadot.staking_amount > 0.0,
        polkadot.staking_duration > 0,
        polkadot.validator_nominations > 0,
        polkadot.parachain_interactions > 0,
        polkadot.account_age > 0,
        polkadot.identity_verified,
    ];
    signals.iter().filter(|s| **s).count() as u32
}

/// Coverage saturates exponentially with active metrics; clarity is 0.0-1.0
fn calculate_confidence(active_signals: u32, clarity: f64) -> u8 {
    let coverage = 1.0 - (-COVERAGE_GROWTH_RATE * active_signals as f64).exp();
    let confidence = CONFIDENCE_BASE
        + CONFIDENCE_COVERAGE_WEIGHT * coverage
        + CONFIDENCE_CLARITY_WEIGHT * clarity.clamp(0.0, 1.0);
    confidence.round().clamp(0.0, MAX_CONFIDENCE) as u8
}

// ============================================================================
// Rule-based insights
// ============================================================================

/// Deterministic insights: never fails, never calls out
pub fn generate_rule_based_insights(
    stellar: &StellarActivity,
    polkadot: &PolkadotActivity,
    overall_score: u32,
    breakdown: &ScoreBreakdown,
) -> AiInsights {
    let s = &stellar.metrics;
    let p = &polkadot.metrics;

    let classification = classify_profile(s, p, overall_score, breakdown);
    let strengths = collect_strengths(s, p, overall_score);
    let (red_flags, recommendations) = collect_flags_and_recommendations(s, p, classification.profile);
    let summary = template_summary(
        classification.profile,
        overall_score,
        stellar.score,
        polkadot.score,
        breakdown,
    );

    AiInsights {
        profile: classification.profile,
        confidence: classification.confidence,
        summary,
        summary_source: SummarySource::Template,
        strengths,
        recommendations,
        red_flags,
    }
}

fn collect_strengths(s: &StellarMetrics, p: &PolkadotMetrics, overall_score: u32) -> Vec<String> {
    let mut strengths = Vec::new();

    if p.identity_verified {
        strengths.push("Verified on-chain identity on Polkadot".to_string());
    }
    if p.governance_votes >= ACTIVE_GOVERNANCE_VOTES {
        strengths.push(format!(
            "Active governance participant ({} votes)",
            p.governance_votes
        ));
    }
    if p.staking_amount > 0.0 && p.staking_duration >= LONG_TERM_STAKING_DAYS {
        strengths.push(format!(
            "Long-term staker ({:.2} DOT bonded for {} days)",
            p.staking_amount, p.staking_duration
        ));
    }
    if p.validator_nominations >= DIVERSIFIED_NOMINATIONS {
        strengths.push(format!(
            "Nominates {} validators",
            p.validator_nominations
        ));
    }
    if s.transaction_count >= SUSTAINED_TRANSACTIONS {
        strengths.push(format!(
            "Sustained Stellar activity ({} transactions)",
            s.transaction_count
        ));
    }
    if s.payment_count >= REGULAR_PAYMENTS {
        strengths.push(format!("Regular payment activity ({} payments)", s.payment_count));
    }
    if s.liquidity_provided > 0.0 {
        strengths.push(format!(
            "Provides liquidity ({:.2} XLM supplied)",
            s.liquidity_provided
        ));
    }
    let oldest = s.account_age.max(p.account_age);
    if oldest >= ESTABLISHED_ACCOUNT_DAYS {
        strengths.push(format!("Established on-chain presence ({} days)", oldest));
    }
    if s.asset_diversity >= DIVERSIFIED_ASSETS {
        strengths.push(format!("Diversified holdings ({} assets)", s.asset_diversity));
    }
    if overall_score >= TOP_TIER_SCORE {
        strengths.push("Top-tier overall reputation".to_string());
    }

    strengths
}

fn collect_flags_and_recommendations(
    s: &StellarMetrics,
    p: &PolkadotMetrics,
    profile: ReputationProfile,
) -> (Vec<String>, Vec<String>) {
    let mut red_flags = Vec::new();
    let mut recommendations = Vec::new();

    if p.governance_votes == 0 {
        red_flags.push("No governance participation on Polkadot".to_string());
        recommendations
            .push("Vote on Polkadot referenda to build a governance track record".to_string());
    }
    if !p.identity_verified {
        red_flags.push("No verified on-chain identity".to_string());
        recommendations.push(
            "Set an on-chain identity and request a judgement from a registrar".to_string(),
        );
    }
    if s.account_age.max(p.account_age) < NEW_ACCOUNT_DAYS {
        red_flags.push(format!(
            "Both accounts are less than {} days old",
            NEW_ACCOUNT_DAYS
        ));
    }
    if s.account_age < NEW_ACCOUNT_DAYS && s.transaction_count > SUSTAINED_TRANSACTIONS {
        red_flags.push(format!(
            "Stellar account is {} days old but has {} transactions",
            s.account_age, s.transaction_count
        ));
    }
    if p.staking_amount > 0.0 && p.validator_nominations == 0 {
        red_flags.push("Bonded DOT without any validator nominations".to_string());
        recommendations
            .push("Nominate validators so bonded DOT actively secures the network".to_string());
    }
    if s.transaction_count == 0 {
        red_flags.push("No Stellar transaction history".to_string());
    }

    if p.staking_amount <= 0.0 {
        recommendations.push(
            "Stake DOT and nominate validators to show long-term commitment".to_string(),
        );
    }
    if s.liquidity_provided <= 0.0 {
        recommendations
            .push("Provide liquidity to a Stellar AMM pool to earn liquidity points".to_string());
    }
    if s.asset_diversity < LOW_ASSET_DIVERSITY {
        recommendations.push("Hold a broader set of Stellar assets".to_string());
    }
    if profile == ReputationProfile::Newcomer {
        recommendations.push(
            "Build consistent activity on both networks to establish a reputation".to_string(),
        );
    }

    (red_flags, recommendations)
}

fn template_summary(
    profile: ReputationProfile,
    overall_score: u32,
    stellar_score: u32,
    polkadot_score: u32,
    breakdown: &ScoreBreakdown,
) -> String {
    let tier = ScoreTier::from_score(overall_score);

    if profile == ReputationProfile::Newcomer {
        return format!(
            "Newcomer with an overall reputation score of {}/{} ({}). There is little \
             on-chain history on Stellar or Polkadot yet.",
            overall_score,
            MAX_OVERALL_SCORE,
            tier.label()
        );
    }

    let strongest = BreakdownCategory::ALL
        .into_iter()
        .max_by(|a, b| breakdown.share(*a).total_cmp(&breakdown.share(*b)))
        .unwrap_or(BreakdownCategory::TransactionConsistency);

    format!(
        "{} profile ({}) with an overall reputation score of {}/{} ({}). Strongest signal: {} \
         at {:.0}% of its maximum. Stellar contributes {}/{} and Polkadot {}/{}.",
        profile,
        profile.description().to_lowercase(),
        overall_score,
        MAX_OVERALL_SCORE,
        tier.label(),
        strongest.label(),
        breakdown.share(strongest) * 100.0,
        stellar_score,
        STELLAR_MAX_SCORE,
        polkadot_score,
        POLKADOT_MAX_SCORE
    )
}

// ============================================================================
// Insight Engine
// ============================================================================

/// Default narrator deadline
pub const DEFAULT_NARRATOR_TIMEOUT: Duration = Duration::from_secs(8);

/// Rule-based insights, optionally decorated by a narrator
#[derive(Clone)]
pub struct InsightEngine {
    narrator: Option<Arc<dyn InsightNarrator>>,
    narrator_timeout: Duration,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::rule_based()
    }
}

impl InsightEngine {
    /// Engine without a narrator
    pub fn rule_based() -> Self {
        Self {
            narrator: None,
            narrator_timeout: DEFAULT_NARRATOR_TIMEOUT,
        }
    }

    pub fn with_narrator(narrator: Arc<dyn InsightNarrator>, narrator_timeout: Duration) -> Self {
        Self {
            narrator: Some(narrator),
            narrator_timeout,
        }
    }

    /// Generate insights. Always returns a complete record.
    pub async fn generate(
        &self,
        stellar: &StellarActivity,
        polkadot: &PolkadotActivity,
        overall_score: u32,
        breakdown: &ScoreBreakdown,
    ) -> AiInsights {
        let mut insights = generate_rule_based_insights(stellar, polkadot, overall_score, breakdown);

        let Some(narrator) = &self.narrator else {
            return insights;
        };

        let context = NarrationContext {
            profile: insights.profile,
            tier: ScoreTier::from_score(overall_score),
            overall_score,
            stellar_score: stellar.score,
            polkadot_score: polkadot.score,
            stellar: stellar.metrics.clone(),
            polkadot: polkadot.metrics.clone(),
            breakdown: *breakdown,
            strengths: insights.strengths.clone(),
            red_flags: insights.red_flags.clone(),
            template_summary: insights.summary.clone(),
        };

        match self.narrate_with_deadline(narrator.as_ref(), &context).await {
            Ok(summary) => {
                insights.summary = summary;
                insights.summary_source = SummarySource::Narrator;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Narrator unavailable, keeping templated summary");
            }
        }

        insights
    }

    async fn narrate_with_deadline(
        &self,
        narrator: &dyn InsightNarrator,
        context: &NarrationContext,
    ) -> Result<String, NarratorError> {
        let summary = tokio::time::timeout(self.narrator_timeout, narrator.narrate(context))
            .await
            .map_err(|_| NarratorError::Timeout(self.narrator_timeout.as_millis() as u64))??;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(NarratorError::EmptyResponse);
        }
        Ok(summary.to_string())
    }
}
