//! Data models for the reputation service

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::reputation::SimulationScenario;

mod activity;
mod reputation;

pub use activity::*;
pub use reputation::*;

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Body of `POST /api/reputation/score`: metrics already fetched from both chains
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate]
    pub stellar: StellarMetrics,
    #[validate]
    pub polkadot: PolkadotMetrics,
}

/// Body of `POST /api/reputation/simulate`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulateRequest {
    #[validate]
    pub stellar: StellarMetrics,
    #[validate]
    pub polkadot: PolkadotMetrics,
    pub scenario: SimulationScenario,
}

/// Query for `GET /api/reputation/validate`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateQuery {
    pub stellar_address: Option<String>,
    pub polkadot_address: Option<String>,
}

/// Result of checking one address
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressCheck {
    pub provided: bool,
    pub valid: bool,
}

/// Response of `GET /api/reputation/validate`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub stellar: AddressCheck,
    pub polkadot: AddressCheck,
    pub can_scan: bool,
}
