//! Periodizer: one observation per calendar period.
//!
//! The first observation of each period is kept, matching the convention of
//! investing at the start of a period. Periods without observations are
//! absent from the output; nothing is interpolated.

use super::error::DcaError;
use super::period::{Interval, PeriodUnit};
use super::price::PricePoint;

/// Reduces a sorted price series to the earliest point of every period.
///
/// The input must already be sorted by date; ordering is not re-checked here.
pub fn periodize(series: &[PricePoint], unit: PeriodUnit) -> Result<Vec<PricePoint>, DcaError> {
    if series.is_empty() {
        return Err(DcaError::EmptySeries);
    }

    let mut periodized: Vec<PricePoint> = Vec::new();
    let mut current = None;

    for point in series {
        let key = unit.key(point.date);
        if current != Some(key) {
            current = Some(key);
            periodized.push(*point);
        }
    }

    Ok(periodized)
}

/// Thins a daily series to the sampling interval a provider was asked for.
///
/// An empty series stays empty; emptiness is reported by the caller.
pub fn apply_interval(series: Vec<PricePoint>, interval: Interval) -> Vec<PricePoint> {
    if interval == Interval::Daily {
        return series;
    }
    periodize(&series, interval.period_unit()).unwrap_or_default()
}
