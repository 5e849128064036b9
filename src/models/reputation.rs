//! Reputation record and its parts

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{PolkadotActivity, StellarActivity};

// ============================================================================
// Profile
// ============================================================================

/// Behavioral classification derived from the dominant scoring signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReputationProfile {
    Trader,
    Governor,
    Staker,
    #[serde(rename = "Liquidity Provider")]
    LiquidityProvider,
    Balanced,
    Newcomer,
}

impl ReputationProfile {
    pub fn label(&self) -> &'static str {
        match self {
            ReputationProfile::Trader => "Trader",
            ReputationProfile::Governor => "Governor",
            ReputationProfile::Staker => "Staker",
            ReputationProfile::LiquidityProvider => "Liquidity Provider",
            ReputationProfile::Balanced => "Balanced",
            ReputationProfile::Newcomer => "Newcomer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReputationProfile::Trader => "Frequent, sustained transaction activity on Stellar",
            ReputationProfile::Governor => "Engaged in on-chain governance on Polkadot",
            ReputationProfile::Staker => "Long-term capital commitment through staking",
            ReputationProfile::LiquidityProvider => "Supplies liquidity to Stellar pools",
            ReputationProfile::Balanced => "Comparable activity across several categories",
            ReputationProfile::Newcomer => "Little on-chain history on either network",
        }
    }
}

impl fmt::Display for ReputationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Tier
// ============================================================================

/// Coarse label for an overall score
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    /// 800-1000
    Excellent,
    /// 600-799
    Good,
    /// 400-599
    Fair,
    /// 200-399
    Developing,
    /// 0-199
    Minimal,
}

impl ScoreTier {
    pub fn from_score(score: u32) -> Self {
        match score {
            800..=u32::MAX => ScoreTier::Excellent,
            600..=799 => ScoreTier::Good,
            400..=599 => ScoreTier::Fair,
            200..=399 => ScoreTier::Developing,
            _ => ScoreTier::Minimal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent",
            ScoreTier::Good => "Good",
            ScoreTier::Fair => "Fair",
            ScoreTier::Developing => "Developing",
            ScoreTier::Minimal => "Minimal",
        }
    }
}

// ============================================================================
// Breakdown
// ============================================================================

/// Cross-chain explanatory categories. Not a decomposition of the per-chain
/// sub-scores: each category has its own scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakdownCategory {
    TransactionConsistency,
    GovernanceParticipation,
    StakingBehavior,
    LiquidityProvision,
    AccountAge,
    AssetDiversity,
}

impl BreakdownCategory {
    pub const ALL: [BreakdownCategory; 6] = [
        BreakdownCategory::TransactionConsistency,
        BreakdownCategory::GovernanceParticipation,
        BreakdownCategory::StakingBehavior,
        BreakdownCategory::LiquidityProvision,
        BreakdownCategory::AccountAge,
        BreakdownCategory::AssetDiversity,
    ];

    /// Upper bound of the category
    pub fn max(&self) -> u32 {
        match self {
            BreakdownCategory::TransactionConsistency => 200,
            BreakdownCategory::GovernanceParticipation => 250,
            BreakdownCategory::StakingBehavior => 200,
            BreakdownCategory::LiquidityProvision => 150,
            BreakdownCategory::AccountAge => 100,
            BreakdownCategory::AssetDiversity => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BreakdownCategory::TransactionConsistency => "Transaction Consistency",
            BreakdownCategory::GovernanceParticipation => "Governance Participation",
            BreakdownCategory::StakingBehavior => "Staking Behavior",
            BreakdownCategory::LiquidityProvision => "Liquidity Provision",
            BreakdownCategory::AccountAge => "Account Age",
            BreakdownCategory::AssetDiversity => "Asset Diversity",
        }
    }
}

/// Category totals, each within `0..=BreakdownCategory::max()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub transaction_consistency: u32,
    pub governance_participation: u32,
    pub staking_behavior: u32,
    pub liquidity_provision: u32,
    pub account_age: u32,
    pub asset_diversity: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, category: BreakdownCategory) -> u32 {
        match category {
            BreakdownCategory::TransactionConsistency => self.transaction_consistency,
            BreakdownCategory::GovernanceParticipation => self.governance_participation,
            BreakdownCategory::StakingBehavior => self.staking_behavior,
            BreakdownCategory::LiquidityProvision => self.liquidity_provision,
            BreakdownCategory::AccountAge => self.account_age,
            BreakdownCategory::AssetDiversity => self.asset_diversity,
        }
    }

    /// Category value as a share of its own maximum (0.0-1.0)
    pub fn share(&self, category: BreakdownCategory) -> f64 {
        self.get(category) as f64 / category.max() as f64
    }

    /// `(category, value, max)` for every category, in display order
    pub fn categories(&self) -> impl Iterator<Item = (BreakdownCategory, u32, u32)> + '_ {
        BreakdownCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c), c.max()))
    }
}

// ============================================================================
// Insights
// ============================================================================

/// Where the summary prose came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Template,
    Narrator,
}

/// Profile, confidence and narrative insights for one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    pub profile: ReputationProfile,
    /// 0-100
    pub confidence: u8,
    pub summary: String,
    pub summary_source: SummarySource,
    pub strengths: Vec<String>,
    pub recommendations: Vec<String>,
    pub red_flags: Vec<String>,
}

// ============================================================================
// Record
// ============================================================================

/// Full result of one reputation scan. Built once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationRecord {
    /// 0-1000, always `stellar.score + polkadot.score`
    pub overall_score: u32,
    pub profile: ReputationProfile,
    pub tier: ScoreTier,
    pub stellar: StellarActivity,
    pub polkadot: PolkadotActivity,
    pub breakdown: ScoreBreakdown,
    pub ai_insights: AiInsights,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}
