//! Configuration validation.
//!
//! Checks the `[data]` and `[simulation]` sections before anything is fetched.

use crate::domain::error::DcaError;
use crate::domain::period::{Interval, PeriodUnit};
use crate::domain::request::check_symbol;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_data_source(config)?;
    validate_symbol(config)?;
    validate_amount(config)?;
    validate_dates(config)?;
    validate_interval(config)?;
    validate_period(config)?;
    Ok(())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());
    match source.trim().to_lowercase().as_str() {
        "csv" => Ok(()),
        "sqlite" => {
            config.require_string("sqlite", "path")?;
            Ok(())
        }
        other => Err(DcaError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown data source '{other}' (expected csv or sqlite)"),
        }),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let symbol = config.require_string("simulation", "symbol")?;
    check_symbol(symbol.trim())
}

fn validate_amount(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let raw = config.require_string("simulation", "amount")?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(DcaError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "amount".to_string(),
            reason: "amount must be a positive number".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let start_str = config.get_string("simulation", "start_date");
    let end_str = config.get_string("simulation", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(DcaError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` value from the `[simulation]` section.
pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, DcaError> {
    match value {
        None => Err(DcaError::ConfigMissing {
            section: "simulation".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
            DcaError::ConfigInvalid {
                section: "simulation".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string("simulation", "interval") {
        None => Ok(()),
        Some(s) => s
            .parse::<Interval>()
            .map(|_| ())
            .map_err(|reason| DcaError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "interval".to_string(),
                reason,
            }),
    }
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string("simulation", "period") {
        None => Ok(()),
        Some(s) => s
            .parse::<PeriodUnit>()
            .map(|_| ())
            .map_err(|reason| DcaError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "period".to_string(),
                reason,
            }),
    }
}
