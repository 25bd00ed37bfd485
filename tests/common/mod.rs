#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};
use rotatrader::domain::backtest::RotationConfig;
use rotatrader::domain::error::RotatraderError;
pub use rotatrader::domain::price::{PriceBar, PriceSeries};
use rotatrader::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, fn(&str) -> RotatraderError>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, source: &str, series: PriceSeries) -> Self {
        self.data.insert(source.to_string(), series);
        self
    }

    pub fn with_error(mut self, source: &str, err: fn(&str) -> RotatraderError) -> Self {
        self.errors.insert(source.to_string(), err);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        source: &str,
        _required_columns: &[String],
    ) -> Result<PriceSeries, RotatraderError> {
        if let Some(make_err) = self.errors.get(source) {
            return Err(make_err(source));
        }
        self.data
            .get(source)
            .cloned()
            .ok_or_else(|| RotatraderError::NotFound {
                path: source.to_string(),
            })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn add_months(start: NaiveDate, months: u32) -> NaiveDate {
    let total = start.month0() + months;
    NaiveDate::from_ymd_opt(start.year() + (total / 12) as i32, total % 12 + 1, start.day())
        .unwrap()
}

/// One bar per month on the 15th, starting January 2020.
pub fn monthly_series(closes: &[f64]) -> PriceSeries {
    monthly_series_from(date(2020, 1, 15), closes)
}

pub fn monthly_series_from(start: NaiveDate, closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: add_months(start, i as u32),
            open: Some(close),
            close: Some(close),
        })
        .collect();
    PriceSeries::from_bars(bars)
}

/// Business-day-ish daily bars: weekdays only, price rising by `step` per day.
pub fn daily_series(start: NaiveDate, days: u32, start_price: f64, step: f64) -> PriceSeries {
    let bars = (0..days)
        .map(|i| start + chrono::Duration::days(i as i64))
        .filter(|d| d.weekday().number_from_monday() <= 5)
        .enumerate()
        .map(|(i, d)| {
            let price = start_price + step * i as f64;
            PriceBar {
                date: d,
                open: Some(price - 0.5),
                close: Some(price),
            }
        })
        .collect();
    PriceSeries::from_bars(bars)
}

pub fn default_config() -> RotationConfig {
    RotationConfig::default()
}

pub fn write_temp_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    path
}

/// Renders a price CSV with day-first dates and the usual extra columns.
pub fn price_csv(rows: &[(NaiveDate, f64, f64)]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for (d, open, close) in rows {
        out.push_str(&format!(
            "{},{},{},{},{},1000\n",
            d.format("%d/%m/%Y"),
            open,
            open.max(*close) + 1.0,
            open.min(*close) - 1.0,
            close
        ));
    }
    out
}
