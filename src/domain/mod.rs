//! Core domain types and logic.

pub mod allocation;
pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod merge;
pub mod monthly;
pub mod nav;
pub mod price;
pub mod units;
