//! Core domain types and logic.

pub mod price;
pub mod asset_series;
pub mod return_stats;
pub mod weights;
pub mod evaluator;
pub mod frontier;
pub mod universe;
pub mod config_validation;
pub mod error;
