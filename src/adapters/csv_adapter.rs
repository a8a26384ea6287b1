//! CSV file price adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row. File names
//! match symbols case-insensitively and are listed upper-cased. The date
//! column is `date` (or the first column). The price column is `adj_close`
//! when present, else `close`, else the second column. Rows with an empty or
//! `NaN` price are skipped.

use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::DcaError;
use crate::domain::period::Interval;
use crate::domain::periodize::apply_interval;
use crate::domain::price::{normalize_series, PricePoint};
use crate::domain::request::check_symbol;
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    price: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Locates the file for `symbol`, or `None` when there is none.
    fn csv_path(&self, symbol: &str) -> Result<Option<PathBuf>, DcaError> {
        check_symbol(symbol)?;
        let exact = self.base_path.join(format!("{}.csv", symbol));
        if exact.is_file() {
            return Ok(Some(exact));
        }
        let Ok(entries) = fs::read_dir(&self.base_path) else {
            return Ok(None);
        };
        Ok(entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                path.is_file()
                    && path.extension() == Some(OsStr::new("csv"))
                    && path
                        .file_stem()
                        .and_then(OsStr::to_str)
                        .is_some_and(|stem| stem.eq_ignore_ascii_case(symbol))
            }))
    }

    fn columns(headers: &csv::StringRecord) -> Columns {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase().replace(' ', "_");
                names.contains(&h.as_str())
            })
        };
        Columns {
            date: find(&["date", "timestamp"]).unwrap_or(0),
            price: find(&["adj_close", "adjclose"])
                .or_else(|| find(&["close", "price"]))
                .unwrap_or(1),
        }
    }

    fn read_all(path: &Path) -> Result<Vec<PricePoint>, DcaError> {
        let content = fs::read_to_string(path).map_err(|e| DcaError::Database {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DcaError::Database {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Self::columns(headers);
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| DcaError::Database {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(columns.date).ok_or_else(|| DcaError::Database {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT).map_err(|e| {
                DcaError::Database {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let price_str = record
                .get(columns.price)
                .map(str::trim)
                .unwrap_or_default();
            if price_str.is_empty() {
                continue;
            }
            let price: f64 = price_str.parse().map_err(|e| DcaError::Database {
                reason: format!("invalid price '{}' on {}: {}", price_str, date, e),
            })?;
            if price.is_nan() {
                continue;
            }

            points.push(PricePoint::new(date, price));
        }

        Ok(normalize_series(points))
    }
}

impl PriceDataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, DcaError> {
        let Some(path) = self.csv_path(symbol)? else {
            debug!(symbol, "no csv file for symbol");
            return Ok(Vec::new());
        };
        let points: Vec<PricePoint> = Self::read_all(&path)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date < end_date)
            .collect();
        debug!(symbol, points = points.len(), %interval, "read csv prices");
        Ok(apply_interval(points, interval))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DcaError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DcaError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DcaError::Database {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_uppercase());
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError> {
        let Some(path) = self.csv_path(symbol)? else {
            return Ok(None);
        };
        let points = Self::read_all(&path)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
    }
}
