//! Inner join of two monthly series on month-end date.

use chrono::NaiveDate;

use super::error::RotatraderError;
use super::monthly::{MonthlyBar, MonthlySeries};

/// One month present in both series.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub asset1_open: f64,
    pub asset1_close: f64,
    pub asset1_return: f64,
    pub asset2_open: f64,
    pub asset2_close: f64,
    pub asset2_return: f64,
}

impl MergedRow {
    fn join(asset1: &MonthlyBar, asset2: &MonthlyBar) -> Self {
        MergedRow {
            date: asset1.month_end,
            asset1_open: asset1.open,
            asset1_close: asset1.close,
            asset1_return: asset1.return_pct,
            asset2_open: asset2.open,
            asset2_close: asset2.close,
            asset2_return: asset2.return_pct,
        }
    }
}

/// Both inputs are sorted ascending with unique dates, so a single
/// two-pointer walk yields the intersection already in order.
pub fn merge(
    asset1: &MonthlySeries,
    asset2: &MonthlySeries,
) -> Result<Vec<MergedRow>, RotatraderError> {
    let (left, right) = (&asset1.bars, &asset2.bars);
    let mut rows = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        let (a, b) = (&left[i], &right[j]);
        match a.month_end.cmp(&b.month_end) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                rows.push(MergedRow::join(a, b));
                i += 1;
                j += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(RotatraderError::EmptyIntersection {
            asset1: asset1.prefix.clone(),
            asset2: asset2.prefix.clone(),
        });
    }

    tracing::debug!(
        left = left.len(),
        right = right.len(),
        merged = rows.len(),
        "merged monthly series"
    );
    Ok(rows)
}
