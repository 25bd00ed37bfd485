//! Rotation backtest pipeline.
//!
//! load -> resample -> merge -> allocate -> accumulate units -> NAV.

use chrono::NaiveDate;

use super::allocation::allocate;
use super::error::RotatraderError;
use super::merge::merge;
use super::monthly::resample_monthly;
use super::nav::{compute_nav, PortfolioRow};
use super::price::PriceSeries;
use super::units::accumulate_units;
use crate::ports::data_port::DataPort;

pub const ASSET1_PREFIX: &str = "df1";
pub const ASSET2_PREFIX: &str = "df2";

/// Parameters for one rotation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationConfig {
    /// Capital placed by each allocation stream in a month it fires.
    pub initial_capital: f64,
    /// Capital the benchmark puts into each asset every month.
    pub buy_hold_capital: f64,
    /// Columns every price file must carry.
    pub required_columns: Vec<String>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        RotationConfig {
            initial_capital: 100_000.0,
            buy_hold_capital: 50_000.0,
            required_columns: vec!["Date".into(), "Open".into(), "Close".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotationResult {
    pub rows: Vec<PortfolioRow>,
}

impl RotationResult {
    pub fn final_strategy_nav(&self) -> Option<f64> {
        self.rows.last().map(|r| r.strategy_nav)
    }

    pub fn final_buy_hold_nav(&self) -> Option<f64> {
        self.rows.last().map(|r| r.buy_hold_nav)
    }

    pub fn strategy_curve(&self) -> Vec<(NaiveDate, f64)> {
        self.rows.iter().map(|r| (r.date(), r.strategy_nav)).collect()
    }

    pub fn buy_hold_curve(&self) -> Vec<(NaiveDate, f64)> {
        self.rows.iter().map(|r| (r.date(), r.buy_hold_nav)).collect()
    }
}

/// Runs the pipeline over two already-loaded daily series.
pub fn run_rotation(
    asset1: &PriceSeries,
    asset2: &PriceSeries,
    config: &RotationConfig,
) -> Result<RotationResult, RotatraderError> {
    let monthly1 = resample_monthly(asset1, ASSET1_PREFIX);
    let monthly2 = resample_monthly(asset2, ASSET2_PREFIX);
    tracing::info!(
        asset1_months = monthly1.len(),
        asset2_months = monthly2.len(),
        "resampled to month end"
    );

    let merged = merge(&monthly1, &monthly2)?;
    tracing::info!(months = merged.len(), "merged overlapping months");

    let allocations = allocate(&merged, config.initial_capital);
    let units = accumulate_units(allocations, config.buy_hold_capital);
    let rows = compute_nav(units);

    Ok(RotationResult { rows })
}

/// Loads both sources through `data_port` and runs the pipeline.
pub fn run_rotation_from(
    data_port: &dyn DataPort,
    asset1: &str,
    asset2: &str,
    config: &RotationConfig,
) -> Result<RotationResult, RotatraderError> {
    tracing::info!(source = asset1, "loading asset1");
    let series1 = data_port.fetch_prices(asset1, &config.required_columns)?;
    tracing::info!(source = asset2, "loading asset2");
    let series2 = data_port.fetch_prices(asset2, &config.required_columns)?;

    run_rotation(&series1, &series2, config).map_err(|e| match e {
        RotatraderError::EmptyIntersection { .. } => RotatraderError::EmptyIntersection {
            asset1: asset1.to_string(),
            asset2: asset2.to_string(),
        },
        other => other,
    })
}
