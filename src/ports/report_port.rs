//! Report output port.

use std::path::Path;

use crate::domain::backtest::RotationResult;
use crate::domain::error::RotatraderError;

/// Port for writing a finished rotation backtest somewhere.
pub trait ReportPort {
    fn write(&self, result: &RotationResult, output_path: &Path) -> Result<(), RotatraderError>;
}
