//! Price observations and series checks.

use chrono::NaiveDate;

use super::error::DcaError;

/// One observed closing price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    pub(crate) fn check_price(&self) -> Result<(), DcaError> {
        if self.has_valid_price() {
            Ok(())
        } else {
            Err(DcaError::InvalidPrice {
                date: self.date,
                price: self.price,
            })
        }
    }
}

/// Checks the invariants of a price series: non-empty, dates strictly
/// increasing, every price positive.
pub fn validate_series(series: &[PricePoint]) -> Result<(), DcaError> {
    if series.is_empty() {
        return Err(DcaError::EmptySeries);
    }
    for window in series.windows(2) {
        if window[1].date <= window[0].date {
            return Err(DcaError::UnsortedSeries {
                previous: window[0].date,
                next: window[1].date,
            });
        }
    }
    series.iter().try_for_each(PricePoint::check_price)
}

/// Sorts by date and keeps the first point seen for each date.
///
/// Used by data adapters to turn raw rows into a well-formed series.
pub fn normalize_series(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);
    points
}
