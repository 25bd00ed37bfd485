//! Month-end resampling of daily prices.
//!
//! Each calendar month between the first and last bar becomes one
//! candidate row: first available Open, last available Close, and the
//! percentage change of Close against the immediately preceding calendar
//! month. Rows missing any of the three are dropped, which always removes
//! the leading month.

use chrono::{Datelike, NaiveDate};

use super::price::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBar {
    pub month_end: NaiveDate,
    pub open: f64,
    pub close: f64,
    /// `100 * (close / prev_close - 1)`, rounded to 2 decimals.
    pub return_pct: f64,
}

/// Month-end bars for one asset, labelled with the prefix used in the
/// output column names.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub prefix: String,
    pub bars: Vec<MonthlyBar>,
}

impl MonthlySeries {
    pub fn open_column(&self) -> String {
        format!("{}Open", self.prefix)
    }

    pub fn close_column(&self) -> String {
        format!("{}Close", self.prefix)
    }

    pub fn returns_column(&self) -> String {
        format!("{}_returns", self.prefix)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = next_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Round half to even at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[derive(Debug, Default, Clone, Copy)]
struct MonthAgg {
    open: Option<f64>,
    close: Option<f64>,
}

pub fn resample_monthly(series: &PriceSeries, prefix: &str) -> MonthlySeries {
    let mut bars = Vec::new();
    let Some((first, last)) = series.date_range() else {
        return MonthlySeries {
            prefix: prefix.to_string(),
            bars,
        };
    };

    let mut daily = series.bars().iter().peekable();
    let (mut year, mut month) = (first.year(), first.month());
    let end_key = (last.year(), last.month());
    let mut prev_close: Option<f64> = None;

    loop {
        let mut agg = MonthAgg::default();
        while let Some(bar) = daily.next_if(|b| (b.date.year(), b.date.month()) == (year, month)) {
            if agg.open.is_none() {
                agg.open = bar.open;
            }
            if bar.close.is_some() {
                agg.close = bar.close;
            }
        }

        let date = NaiveDate::from_ymd_opt(year, month, 1).map(month_end);
        let return_pct = match (agg.close, prev_close) {
            (Some(close), Some(prev)) if prev != 0.0 => {
                Some(round_to((close / prev - 1.0) * 100.0, 2))
            }
            _ => None,
        };

        match (date, agg.open, agg.close, return_pct) {
            (Some(month_end), Some(open), Some(close), Some(return_pct))
                if return_pct.is_finite() =>
            {
                bars.push(MonthlyBar {
                    month_end,
                    open,
                    close,
                    return_pct,
                });
            }
            _ => tracing::debug!(prefix, year, month, "month dropped from resample"),
        }

        prev_close = agg.close;
        if (year, month) == end_key {
            break;
        }
        (year, month) = next_month(year, month);
    }

    MonthlySeries {
        prefix: prefix.to_string(),
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceBar;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn bar(date: NaiveDate, open: Option<f64>, close: Option<f64>) -> PriceBar {
        PriceBar { date, open, close }
    }

    #[test]
    fn month_end_handles_leap_year_and_december() {
        assert_eq!(month_end(d(2024, 2, 10)), d(2024, 2, 29));
        assert_eq!(month_end(d(2023, 2, 1)), d(2023, 2, 28));
        assert_eq!(month_end(d(2024, 12, 5)), d(2024, 12, 31));
        assert_eq!(month_end(d(2024, 4, 30)), d(2024, 4, 30));
    }

    #[test]
    fn round_to_is_half_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(-4.545454, 2), -4.55);
    }

    #[test]
    fn single_month_yields_empty_series() {
        let series = PriceSeries::from_bars(vec![
            bar(d(2024, 1, 2), Some(10.0), Some(11.0)),
            bar(d(2024, 1, 31), Some(11.0), Some(12.0)),
        ]);
        let monthly = resample_monthly(&series, "df1");
        assert!(monthly.is_empty());
        assert_eq!(monthly.prefix, "df1");
    }

    #[test]
    fn empty_series_yields_empty_monthly() {
        let monthly = resample_monthly(&PriceSeries::default(), "df1");
        assert!(monthly.is_empty());
    }

    #[test]
    fn takes_first_open_and_last_close() {
        let series = PriceSeries::from_bars(vec![
            bar(d(2024, 1, 2), Some(99.0), Some(100.0)),
            bar(d(2024, 2, 1), Some(101.0), Some(102.0)),
            bar(d(2024, 2, 15), Some(103.0), Some(104.0)),
            bar(d(2024, 2, 28), Some(105.0), Some(110.0)),
        ]);
        let monthly = resample_monthly(&series, "df1");
        assert_eq!(monthly.len(), 1);
        let feb = &monthly.bars[0];
        assert_eq!(feb.month_end, d(2024, 2, 29));
        assert_eq!(feb.open, 101.0);
        assert_eq!(feb.close, 110.0);
        assert_eq!(feb.return_pct, 10.0);
    }

    #[test]
    fn returns_are_rounded_to_two_decimals() {
        let series = PriceSeries::from_bars(vec![
            bar(d(2024, 1, 31), Some(100.0), Some(100.0)),
            bar(d(2024, 2, 29), Some(110.0), Some(110.0)),
            bar(d(2024, 3, 29), Some(105.0), Some(105.0)),
        ]);
        let monthly = resample_monthly(&series, "df1");
        let returns: Vec<_> = monthly.bars.iter().map(|b| b.return_pct).collect();
        assert_eq!(returns, vec![10.0, -4.55]);
    }

    #[test]
    fn gap_month_drops_itself_and_its_successor() {
        let series = PriceSeries::from_bars(vec![
            bar(d(2024, 1, 31), Some(100.0), Some(100.0)),
            bar(d(2024, 2, 29), Some(100.0), Some(110.0)),
            // no March rows
            bar(d(2024, 4, 30), Some(100.0), Some(120.0)),
            bar(d(2024, 5, 31), Some(100.0), Some(132.0)),
        ]);
        let monthly = resample_monthly(&series, "df2");
        let dates: Vec<_> = monthly.bars.iter().map(|b| b.month_end).collect();
        assert_eq!(dates, vec![d(2024, 2, 29), d(2024, 5, 31)]);
        assert_eq!(monthly.bars[1].return_pct, 10.0);
    }

    #[test]
    fn missing_prices_are_skipped_within_month() {
        let series = PriceSeries::from_bars(vec![
            bar(d(2024, 1, 31), Some(50.0), Some(50.0)),
            bar(d(2024, 2, 1), None, Some(48.0)),
            bar(d(2024, 2, 2), Some(48.5), Some(49.0)),
            bar(d(2024, 2, 29), Some(49.0), None),
        ]);
        let monthly = resample_monthly(&series, "df2");
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly.bars[0].open, 48.5);
        assert_eq!(monthly.bars[0].close, 49.0);
        assert_eq!(monthly.bars[0].return_pct, -2.0);
    }

    #[test]
    fn zero_prior_close_drops_month() {
        let series = PriceSeries::from_bars(vec![
            bar(d(2024, 1, 31), Some(1.0), Some(0.0)),
            bar(d(2024, 2, 29), Some(1.0), Some(5.0)),
            bar(d(2024, 3, 29), Some(1.0), Some(10.0)),
        ]);
        let monthly = resample_monthly(&series, "df1");
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly.bars[0].month_end, d(2024, 3, 31));
        assert_eq!(monthly.bars[0].return_pct, 100.0);
    }

    #[test]
    fn column_names_use_prefix() {
        let monthly = resample_monthly(&PriceSeries::default(), "df1");
        assert_eq!(monthly.open_column(), "df1Open");
        assert_eq!(monthly.close_column(), "df1Close");
        assert_eq!(monthly.returns_column(), "df1_returns");
    }
}
