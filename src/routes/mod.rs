//! Route definitions for the reputation API

mod reputation;

pub use reputation::reputation_routes;
