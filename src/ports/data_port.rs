//! Price data access port.

use crate::domain::error::RotatraderError;
use crate::domain::price::PriceSeries;

pub trait DataPort {
    /// Loads the daily series named by `source`, failing if any of
    /// `required_columns` is absent.
    fn fetch_prices(
        &self,
        source: &str,
        required_columns: &[String],
    ) -> Result<PriceSeries, RotatraderError>;
}
