//! Net asset value of the accumulated units, marked at each month's close.

use chrono::NaiveDate;

use super::units::UnitRow;

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioRow {
    pub units: UnitRow,
    pub strategy_nav: f64,
    pub buy_hold_nav: f64,
}

impl PortfolioRow {
    pub fn date(&self) -> NaiveDate {
        self.units.allocation.date
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Holdings {
    units1: f64,
    units2: f64,
    bh_units1: f64,
    bh_units2: f64,
}

/// Running unit totals are never reset; every month's purchase adds to the
/// position and the whole position is marked at that month's close.
pub fn compute_nav(rows: Vec<UnitRow>) -> Vec<PortfolioRow> {
    let mut held = Holdings::default();
    rows.into_iter()
        .map(|units| {
            held.units1 += units.units1;
            held.units2 += units.units2;
            held.bh_units1 += units.bh_units1;
            held.bh_units2 += units.bh_units2;

            let close1 = units.allocation.asset1_close;
            let close2 = units.allocation.asset2_close;
            PortfolioRow {
                strategy_nav: held.units1 * close1 + held.units2 * close2,
                buy_hold_nav: held.bh_units1 * close1 + held.bh_units2 * close2,
                units,
            }
        })
        .collect()
}
