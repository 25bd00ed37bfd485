//! Monthly capital allocation.
//!
//! Two allocation streams are computed from the same pair of returns.
//! Stream 1 funds asset1 when asset1 had the lower return; stream 2 funds
//! the position when asset1 had the higher return. The unit accumulator
//! prices stream 1 against asset1 and stream 2 against asset2. Each stream
//! evaluates its own comparison, so a tie (or NaN) leaves both at zero.

use chrono::NaiveDate;

use super::merge::MergedRow;

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRow {
    pub date: NaiveDate,
    pub asset1_open: f64,
    pub asset1_close: f64,
    pub asset1_return: f64,
    pub asset2_open: f64,
    pub asset2_close: f64,
    pub asset2_return: f64,
    /// Stream 1: `capital` when asset1 underperformed asset2, else 0.
    pub capital_allocation_1: f64,
    /// Stream 2: `capital` when asset1 outperformed asset2, else 0.
    pub capital_allocation_2: f64,
}

pub fn allocate_favoring_lower_return(asset1_return: f64, asset2_return: f64, capital: f64) -> f64 {
    if asset1_return < asset2_return {
        capital
    } else {
        0.0
    }
}

pub fn allocate_favoring_higher_return(
    asset1_return: f64,
    asset2_return: f64,
    capital: f64,
) -> f64 {
    if asset1_return > asset2_return {
        capital
    } else {
        0.0
    }
}

pub fn allocate(rows: &[MergedRow], capital: f64) -> Vec<AllocationRow> {
    rows.iter()
        .map(|row| AllocationRow {
            date: row.date,
            asset1_open: row.asset1_open,
            asset1_close: row.asset1_close,
            asset1_return: row.asset1_return,
            asset2_open: row.asset2_open,
            asset2_close: row.asset2_close,
            asset2_return: row.asset2_return,
            capital_allocation_1: allocate_favoring_lower_return(
                row.asset1_return,
                row.asset2_return,
                capital,
            ),
            capital_allocation_2: allocate_favoring_higher_return(
                row.asset1_return,
                row.asset2_return,
                capital,
            ),
        })
        .collect()
}
