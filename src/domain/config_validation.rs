//! Configuration validation.
//!
//! Validates config fields before a backtest runs.

use crate::domain::error::RotatraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), RotatraderError> {
    validate_capital(config, "initial_capital")?;
    validate_capital(config, "buy_hold_capital")?;
    validate_asset_path(config, "asset1")?;
    validate_asset_path(config, "asset2")?;
    validate_required_columns(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> RotatraderError {
    RotatraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Absent keys fall back to defaults; present ones must be positive numbers.
fn validate_capital(config: &dyn ConfigPort, key: &str) -> Result<(), RotatraderError> {
    let Some(raw) = config.get_string("backtest", key) else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        Ok(_) => Err(invalid("backtest", key, format!("{key} must be positive"))),
        Err(_) => Err(invalid("backtest", key, format!("{key} must be a number"))),
    }
}

fn validate_asset_path(config: &dyn ConfigPort, key: &str) -> Result<(), RotatraderError> {
    match config.get_string("backtest", key) {
        Some(s) if s.trim().is_empty() => {
            Err(invalid("backtest", key, format!("{key} must not be blank")))
        }
        _ => Ok(()),
    }
}

pub fn parse_columns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn validate_required_columns(config: &dyn ConfigPort) -> Result<(), RotatraderError> {
    let Some(raw) = config.get_string("data", "required_columns") else {
        return Ok(());
    };
    let columns = parse_columns(&raw);
    for needed in ["Date", "Open", "Close"] {
        if !columns.iter().any(|c| c == needed) {
            return Err(invalid(
                "data",
                "required_columns",
                format!("required_columns must include {needed}"),
            ));
        }
    }
    Ok(())
}
