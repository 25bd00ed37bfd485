//! CSV price file adapter.

use crate::domain::error::RotatraderError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::ErrorKind;
use std::path::PathBuf;

// Two-digit years go first: `%Y` also accepts two digits.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d %b %y",
    "%d-%b-%y",
    "%d %B %y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

/// Reads `Date`/`Open`/`Close` columns from CSV files. Sources are paths,
/// resolved against `base_path` when relative.
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

/// Parses a date, day first. Trailing time-of-day is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parses a price cell. Blank or placeholder cells are missing prices.
pub fn parse_price(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.to_ascii_lowercase().as_str() {
        "" | "-" | "nan" | "null" | "na" | "n/a" => None,
        _ => cleaned.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        source: &str,
        required_columns: &[String],
    ) -> Result<PriceSeries, RotatraderError> {
        let path = self.csv_path(source);
        let source_path = path.display().to_string();
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RotatraderError::NotFound {
                path: source_path.clone(),
            },
            _ => RotatraderError::Io(e),
        })?;

        let csv_err = |e: csv::Error| RotatraderError::Csv {
            path: source_path.clone(),
            reason: e.to_string(),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let missing: Vec<String> = required_columns
            .iter()
            .filter(|c| !headers.contains(*c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RotatraderError::Schema {
                path: source_path.clone(),
                missing,
            });
        }

        let column = |name: &str| headers.iter().position(|h| h == name);
        let date_col = column("Date");
        let open_col = column("Open");
        let close_col = column("Close");

        let mut bars = Vec::new();
        let mut dropped = 0usize;
        for result in rdr.records() {
            let record = result.map_err(csv_err)?;
            let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i));

            let Some(date) = cell(date_col).and_then(parse_date) else {
                tracing::debug!(
                    path = %source_path,
                    line = ?record.position().map(|p| p.line()),
                    "unparseable date, row dropped"
                );
                dropped += 1;
                continue;
            };

            bars.push(PriceBar {
                date,
                open: cell(open_col).and_then(parse_price),
                close: cell(close_col).and_then(parse_price),
            });
        }

        if dropped > 0 {
            tracing::warn!(path = %source_path, dropped, "rows dropped for unparseable dates");
        }

        let series = PriceSeries::from_bars(bars);
        if let Some((start, end)) = series.date_range() {
            tracing::info!(path = %source_path, rows = series.len(), %start, %end, "loaded price file");
        } else {
            tracing::warn!(path = %source_path, "price file has no usable rows");
        }
        Ok(series)
    }
}
