//! Price data access port.

use crate::domain::error::DcaError;
use crate::domain::period::Interval;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

/// A source of historical closing prices.
///
/// Implementations return points sorted by date with no duplicate dates.
/// `start_date` is inclusive and `end_date` exclusive. A symbol or range
/// with no data yields an empty series rather than an error.
pub trait PriceDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, DcaError>;

    fn list_symbols(&self) -> Result<Vec<String>, DcaError>;

    /// First date, last date and number of stored points for `symbol`.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError>;
}
