//! Daily price bars and the date-indexed series built from them.

use chrono::NaiveDate;

/// One trading day. Prices are optional because source files carry blanks.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub close: Option<f64>,
}

/// Daily bars sorted ascending by date with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Sorts the bars by date and collapses duplicate dates, keeping the
    /// bar that appeared last in the input.
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        // Stable sort keeps input order within a date, so the last one wins.
        bars.sort_by_key(|b| b.date);
        let mut unique: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last_mut() {
                Some(prev) if prev.date == bar.date => {
                    tracing::warn!(date = %bar.date, "duplicate date, keeping last row");
                    *prev = bar;
                }
                _ => unique.push(bar),
            }
        }
        PriceSeries { bars: unique }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// First and last date, or `None` for an empty series.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
