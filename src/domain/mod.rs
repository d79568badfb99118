//! Core domain types and logic.

pub mod quote;
pub mod price_series;
pub mod indicator;
pub mod signal;
pub mod portfolio;
pub mod backtest;
pub mod summary;
pub mod config;
pub mod config_validation;
pub mod pipeline;
pub mod error;
