//! Scoring, classification and orchestration services

pub mod breakdown;
pub mod insights;
pub mod narrator;
pub mod reputation;
pub mod scoring;

pub use insights::InsightEngine;
pub use narrator::{HttpNarrator, InsightNarrator};
pub use reputation::ReputationEngine;
