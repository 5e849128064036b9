//! Per-chain scorers and score aggregation
//!
//! Both scorers are sums of independently capped components, clamped to the
//! chain's maximum. The chain maxima are complementary (450 + 550 = 1000), so
//! the overall score is the plain sum of the two sub-scores and anyone can
//! check `overall == stellar + polkadot`.

use serde::{Deserialize, Serialize};

use crate::models::{PolkadotMetrics, StellarMetrics};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Maximum Stellar sub-score
pub const STELLAR_MAX_SCORE: u32 = 450;

/// Maximum Polkadot sub-score
pub const POLKADOT_MAX_SCORE: u32 = 550;

/// Maximum overall score
pub const MAX_OVERALL_SCORE: u32 = 1000;

/// Days per account-age / staking-duration point
const DAYS_PER_POINT: u64 = 7;

// Stellar component caps
const STELLAR_TX_CAP: u32 = 100;
const STELLAR_VOLUME_CAP: u32 = 100;
const STELLAR_PAYMENT_CAP: u32 = 80;
const STELLAR_AGE_CAP: u32 = 70;
const STELLAR_DIVERSITY_CAP: u32 = 50;
const STELLAR_LIQUIDITY_CAP: u32 = 50;

// Polkadot component caps
const POLKADOT_GOVERNANCE_CAP: u32 = 150;
const POLKADOT_STAKE_CAP: u32 = 120;
const POLKADOT_DURATION_CAP: u32 = 80;
const POLKADOT_NOMINATION_CAP: u32 = 50;
const POLKADOT_AGE_CAP: u32 = 80;
const POLKADOT_IDENTITY_BONUS: u32 = 70;

// ============================================================================
// Component Helpers
// ============================================================================

/// `floor(count / divisor)`, capped
pub(crate) fn per_unit_points(count: u64, divisor: u64, cap: u32) -> u32 {
    (count / divisor).min(cap as u64) as u32
}

/// `count * multiplier`, capped
pub(crate) fn multiplied_points(count: u64, multiplier: u64, cap: u32) -> u32 {
    count.saturating_mul(multiplier).min(cap as u64) as u32
}

/// `floor(log10(amount) * multiplier)`, capped.
///
/// Amounts of zero earn nothing, and so do amounts below one unit whose
/// logarithm is negative.
pub(crate) fn log_points(amount: f64, multiplier: f64, cap: u32) -> u32 {
    if amount <= 0.0 {
        return 0;
    }
    let points = (amount.log10() * multiplier).floor().max(0.0);
    (points as u32).min(cap)
}

// ============================================================================
// Stellar
// ============================================================================

/// Per-component points behind a Stellar sub-score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StellarScoreComponents {
    /// 1 point per 10 transactions (0-100)
    pub transactions: u32,
    /// 20 points per order of magnitude of XLM volume (0-100)
    pub volume: u32,
    /// 1 point per 5 payments (0-80)
    pub payments: u32,
    /// 1 point per week of account age (0-70)
    pub account_age: u32,
    /// 5 points per held asset (0-50)
    pub asset_diversity: u32,
    /// 10 points per order of magnitude of XLM supplied (0-50)
    pub liquidity: u32,
}

impl StellarScoreComponents {
    pub fn from_metrics(metrics: &StellarMetrics) -> Self {
        Self {
            transactions: per_unit_points(metrics.transaction_count, 10, STELLAR_TX_CAP),
            volume: log_points(metrics.total_volume, 20.0, STELLAR_VOLUME_CAP),
            payments: per_unit_points(metrics.payment_count, 5, STELLAR_PAYMENT_CAP),
            account_age: per_unit_points(metrics.account_age, DAYS_PER_POINT, STELLAR_AGE_CAP),
            asset_diversity: multiplied_points(metrics.asset_diversity, 5, STELLAR_DIVERSITY_CAP),
            liquidity: log_points(metrics.liquidity_provided, 10.0, STELLAR_LIQUIDITY_CAP),
        }
    }

    pub fn total(&self) -> u32 {
        let sum = self.transactions
            + self.volume
            + self.payments
            + self.account_age
            + self.asset_diversity
            + self.liquidity;
        sum.min(STELLAR_MAX_SCORE)
    }
}

/// Stellar sub-score (0-450)
pub fn score_stellar(metrics: &StellarMetrics) -> u32 {
    StellarScoreComponents::from_metrics(metrics).total()
}

// ============================================================================
// Polkadot
// ============================================================================

/// Per-component points behind a Polkadot sub-score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolkadotScoreComponents {
    /// 10 points per vote (0-150)
    pub governance: u32,
    /// 20 points per order of magnitude of DOT bonded (0-120)
    pub staking_amount: u32,
    /// 1 point per week bonded (0-80)
    pub staking_duration: u32,
    /// 10 points per nominated validator (0-50)
    pub nominations: u32,
    /// 1 point per week of account age (0-80)
    pub account_age: u32,
    /// Flat bonus for a judged on-chain identity (0 or 70)
    pub identity: u32,
}

impl PolkadotScoreComponents {
    pub fn from_metrics(metrics: &PolkadotMetrics) -> Self {
        Self {
            governance: multiplied_points(metrics.governance_votes, 10, POLKADOT_GOVERNANCE_CAP),
            staking_amount: log_points(metrics.staking_amount, 20.0, POLKADOT_STAKE_CAP),
            staking_duration: per_unit_points(
                metrics.staking_duration,
                DAYS_PER_POINT,
                POLKADOT_DURATION_CAP,
            ),
            nominations: multiplied_points(
                metrics.validator_nominations,
                10,
                POLKADOT_NOMINATION_CAP,
            ),
            account_age: per_unit_points(metrics.account_age, DAYS_PER_POINT, POLKADOT_AGE_CAP),
            identity: if metrics.identity_verified {
                POLKADOT_IDENTITY_BONUS
            } else {
                0
            },
        }
    }

    pub fn total(&self) -> u32 {
        let sum = self.governance
            + self.staking_amount
            + self.staking_duration
            + self.nominations
            + self.account_age
            + self.identity;
        sum.min(POLKADOT_MAX_SCORE)
    }
}

/// Polkadot sub-score (0-550)
pub fn score_polkadot(metrics: &PolkadotMetrics) -> u32 {
    PolkadotScoreComponents::from_metrics(metrics).total()
}

// ============================================================================
// Aggregation
// ============================================================================

/// Overall score (0-1000): the direct sum of both sub-scores
pub fn calculate_overall_score(stellar_score: u32, polkadot_score: u32) -> u32 {
    stellar_score
        .saturating_add(polkadot_score)
        .min(MAX_OVERALL_SCORE)
}
