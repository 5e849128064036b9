//! Chain Reputation Library
//!
//! Cross-chain reputation scoring for Stellar and Polkadot accounts: per-chain
//! scorers, score aggregation, a category breakdown, and profile / insight
//! generation, served over a small HTTP API.

pub mod addresses;
pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
