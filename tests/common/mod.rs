#![allow(dead_code)]

use chrono::NaiveDate;
use dcasim::domain::error::DcaError;
use dcasim::domain::period::Interval;
use dcasim::domain::periodize::apply_interval;
pub use dcasim::domain::price::PricePoint;
use dcasim::ports::data_port::PriceDataPort;
use std::collections::HashMap;

pub struct MockPriceDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check_error(&self, symbol: &str) -> Result<(), DcaError> {
        match self.errors.get(symbol) {
            Some(reason) => Err(DcaError::Database {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, DcaError> {
        self.check_error(symbol)?;
        let points = self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .copied()
                    .filter(|p| p.date >= start_date && p.date < end_date)
                    .collect()
            })
            .unwrap_or_default();
        Ok(apply_interval(points, interval))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DcaError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError> {
        self.check_error(symbol)?;
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn point(date: &str, price: f64) -> PricePoint {
    PricePoint::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), price)
}

/// Daily prices on every calendar day, rising by `step` per day.
pub fn generate_daily(
    start_date: &str,
    count: usize,
    start_price: f64,
    step: f64,
) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            PricePoint::new(
                start + chrono::Duration::days(i as i64),
                start_price + step * i as f64,
            )
        })
        .collect()
}

/// The three-month scenario used across the suite: 100, 200, 100.
pub fn scenario_series() -> Vec<PricePoint> {
    vec![
        point("2023-01-01", 100.0),
        point("2023-02-01", 200.0),
        point("2023-03-01", 100.0),
    ]
}

pub fn csv_file_content(points: &[PricePoint]) -> String {
    let mut out = String::from("date,close\n");
    for p in points {
        out.push_str(&format!("{},{}\n", p.date.format("%Y-%m-%d"), p.price));
    }
    out
}
