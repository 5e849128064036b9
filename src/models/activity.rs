//! Per-chain activity metrics
//!
//! Fetchers produce the `*Metrics` structs; the scorers turn them into the
//! `*Activity` structs that carry the derived sub-score alongside the metrics.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::services::scoring::{score_polkadot, score_stellar};

/// Amounts must be real, non-negative numbers; NaN and infinities are rejected
pub fn finite_non_negative(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("finite_non_negative"))
    }
}

/// Stellar account activity as reported by Horizon, before scoring.
///
/// Preconditions: amounts are finite and non-negative. Validation happens at
/// the request boundary, the scorer trusts these values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StellarMetrics {
    /// Stellar public key (G...)
    pub address: String,
    pub transaction_count: u64,
    /// Outgoing payment volume in XLM
    #[validate(custom = "finite_non_negative")]
    pub total_volume: f64,
    pub payment_count: u64,
    /// Days since the account was first seen
    pub account_age: u64,
    /// Distinct assets held with a positive balance
    pub asset_diversity: u64,
    /// XLM supplied to liquidity pools, 0 if none detected
    #[validate(custom = "finite_non_negative")]
    pub liquidity_provided: f64,
}

/// Scored Stellar activity (sub-score in 0-450)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StellarActivity {
    #[serde(flatten)]
    pub metrics: StellarMetrics,
    pub score: u32,
}

impl StellarActivity {
    pub fn from_metrics(metrics: StellarMetrics) -> Self {
        let score = score_stellar(&metrics);
        Self { metrics, score }
    }
}

/// Polkadot account activity as reported by Subscan, before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PolkadotMetrics {
    /// SS58 address
    pub address: String,
    /// Democracy / OpenGov votes cast
    pub governance_votes: u64,
    /// Bonded amount in DOT
    #[validate(custom = "finite_non_negative")]
    pub staking_amount: f64,
    /// Days the bond has been held
    pub staking_duration: u64,
    /// Validators currently nominated
    pub validator_nominations: u64,
    /// Coarse proxy: extrinsic count / 10
    pub parachain_interactions: u64,
    pub account_age: u64,
    /// Identity carries a Reasonable or KnownGood judgement
    pub identity_verified: bool,
}

/// Scored Polkadot activity (sub-score in 0-550)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolkadotActivity {
    #[serde(flatten)]
    pub metrics: PolkadotMetrics,
    pub score: u32,
}

impl PolkadotActivity {
    pub fn from_metrics(metrics: PolkadotMetrics) -> Self {
        let score = score_polkadot(&metrics);
        Self { metrics, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stellar_metrics_camel_case_wire_names() {
        let json = serde_json::json!({
            "address": "GABC",
            "transactionCount": 50,
            "totalVolume": 1000.0,
            "paymentCount": 25,
            "accountAge": 70,
            "assetDiversity": 4,
            "liquidityProvided": 0.0
        });

        let metrics: StellarMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(metrics.transaction_count, 50);
        assert_eq!(metrics.asset_diversity, 4);
    }

    #[test]
    fn test_activity_flattens_metrics_next_to_score() {
        let activity = StellarActivity::from_metrics(StellarMetrics {
            address: "GABC".to_string(),
            transaction_count: 50,
            total_volume: 1000.0,
            payment_count: 25,
            account_age: 70,
            asset_diversity: 4,
            liquidity_provided: 0.0,
        });

        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["score"], 100);
        assert_eq!(value["transactionCount"], 50);
        assert!(value.get("metrics").is_none());
    }

    #[test]
    fn test_negative_amount_fails_validation() {
        let metrics = PolkadotMetrics {
            staking_amount: -1.0,
            ..Default::default()
        };
        assert!(metrics.validate().is_err());

        let metrics = PolkadotMetrics {
            staking_amount: f64::NAN,
            ..Default::default()
        };
        assert!(metrics.validate().is_err());

        let metrics = PolkadotMetrics {
            staking_amount: 12.5,
            ..Default::default()
        };
        assert!(metrics.validate().is_ok());
    }

    #[test]
    fn test_non_finite_stellar_amounts_fail_validation() {
        let metrics = StellarMetrics {
            total_volume: f64::INFINITY,
            ..Default::default()
        };
        assert!(metrics.validate().is_err());

        let metrics = StellarMetrics {
            liquidity_provided: f64::NAN,
            ..Default::default()
        };
        let errors = metrics.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("liquidity_provided"));

        assert!(StellarMetrics::default().validate().is_ok());
    }

    #[test]
    fn test_finite_non_negative() {
        assert!(finite_non_negative(0.0).is_ok());
        assert!(finite_non_negative(1e300).is_ok());
        assert!(finite_non_negative(-0.01).is_err());
        assert!(finite_non_negative(f64::NEG_INFINITY).is_err());
    }
}
