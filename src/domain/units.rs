//! Units bought each month by the rotation strategy and the buy-and-hold
//! benchmark.

use super::allocation::AllocationRow;
use super::monthly::round_to;

#[derive(Debug, Clone, PartialEq)]
pub struct UnitRow {
    pub allocation: AllocationRow,
    /// Stream 1 capital converted at asset1's close.
    pub units1: f64,
    /// Stream 2 capital converted at asset2's close.
    pub units2: f64,
    pub bh_units1: f64,
    pub bh_units2: f64,
}

/// `capital / price` rounded half-to-even to whole units; 0 when the
/// quotient is not finite (zero or NaN price).
pub fn units_for(capital: f64, price: f64) -> f64 {
    let units = capital / price;
    if units.is_finite() {
        round_to(units, 0)
    } else {
        0.0
    }
}

/// Benchmark units are bought every month with `buy_hold_capital` in each
/// asset, independent of the allocation streams.
pub fn accumulate_units(rows: Vec<AllocationRow>, buy_hold_capital: f64) -> Vec<UnitRow> {
    rows.into_iter()
        .map(|allocation| UnitRow {
            units1: units_for(allocation.capital_allocation_1, allocation.asset1_close),
            units2: units_for(allocation.capital_allocation_2, allocation.asset2_close),
            bh_units1: units_for(buy_hold_capital, allocation.asset1_close),
            bh_units2: units_for(buy_hold_capital, allocation.asset2_close),
            allocation,
        })
        .collect()
}
