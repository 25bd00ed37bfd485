//! Writes the monthly result table as CSV.

use std::path::Path;

use crate::domain::backtest::{RotationResult, ASSET1_PREFIX, ASSET2_PREFIX};
use crate::domain::error::RotatraderError;
use crate::domain::nav::PortfolioRow;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

pub fn header() -> Vec<String> {
    let mut columns = vec!["Date".to_string()];
    for prefix in [ASSET1_PREFIX, ASSET2_PREFIX] {
        columns.push(format!("{prefix}Open"));
        columns.push(format!("{prefix}Close"));
        columns.push(format!("{prefix}_returns"));
    }
    columns.extend(
        [
            "capital_allocation_1",
            "capital_allocation_2",
            "navunits1",
            "navunits2",
            "bhunits1",
            "bhunits2",
            "strategy_nav",
            "buy_hold_nav",
        ]
        .map(String::from),
    );
    columns
}

pub fn record(row: &PortfolioRow) -> Vec<String> {
    let units = &row.units;
    let a = &units.allocation;
    let mut fields = vec![a.date.format("%Y-%m-%d").to_string()];
    fields.extend(
        [
            a.asset1_open,
            a.asset1_close,
            a.asset1_return,
            a.asset2_open,
            a.asset2_close,
            a.asset2_return,
            a.capital_allocation_1,
            a.capital_allocation_2,
            units.units1,
            units.units2,
            units.bh_units1,
            units.bh_units2,
            row.strategy_nav,
            row.buy_hold_nav,
        ]
        .iter()
        .map(f64::to_string),
    );
    fields
}

impl CsvReportAdapter {
    pub fn write_to<W: std::io::Write>(
        &self,
        result: &RotationResult,
        writer: W,
    ) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(header())?;
        for row in &result.rows {
            wtr.write_record(record(row))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &RotationResult, output_path: &Path) -> Result<(), RotatraderError> {
        let csv_err = |e: csv::Error| RotatraderError::Csv {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        };
        let file = std::fs::File::create(output_path)?;
        self.write_to(result, file).map_err(csv_err)?;
        tracing::info!(path = %output_path.display(), rows = result.rows.len(), "wrote result table");
        Ok(())
    }
}
