//! Per-invocation simulation parameters.

use chrono::NaiveDate;

use super::error::DcaError;
use super::period::{Interval, PeriodUnit};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub symbol: String,
    /// First date included.
    pub start_date: NaiveDate,
    /// First date excluded.
    pub end_date: NaiveDate,
    pub interval: Interval,
    pub period: PeriodUnit,
    pub amount: f64,
}

/// Accepts ticker symbols only: ASCII letters, digits and `.^=-`.
///
/// Symbols end up in file names, so separators and traversal never pass.
pub fn check_symbol(symbol: &str) -> Result<(), DcaError> {
    let is_ticker = !symbol.is_empty()
        && symbol != "."
        && symbol != ".."
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'));
    if is_ticker {
        Ok(())
    } else {
        Err(DcaError::ConfigInvalid {
            section: "simulation".into(),
            key: "symbol".into(),
            reason: format!("'{symbol}' is not a ticker symbol"),
        })
    }
}

impl SimulationRequest {
    pub fn validate(&self) -> Result<(), DcaError> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(DcaError::InvalidAmount {
                amount: self.amount,
            });
        }
        if self.symbol.trim().is_empty() {
            return Err(DcaError::ConfigMissing {
                section: "simulation".into(),
                key: "symbol".into(),
            });
        }
        check_symbol(&self.symbol)?;
        if self.start_date >= self.end_date {
            return Err(DcaError::ConfigInvalid {
                section: "simulation".into(),
                key: "start_date".into(),
                reason: "start_date must be before end_date".into(),
            });
        }
        Ok(())
    }
}
