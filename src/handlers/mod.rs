//! API handlers

pub mod reputation;

pub use reputation::*;
