//! SQLite price store adapter.

use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::DcaError;
use crate::domain::period::Interval;
use crate::domain::periodize::apply_interval;
use crate::domain::price::{normalize_series, PricePoint};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::debug;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn db_err(e: r2d2::Error) -> DcaError {
    DcaError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> DcaError {
    DcaError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_row_date(date_str: String) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            date_str.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DcaError> {
        let db_path = config.require_string("sqlite", "path")?;
        let pool_size = config.get_int("sqlite", "pool_size", 4).max(1) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(db_err)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, DcaError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, DcaError> {
        self.pool.get().map_err(db_err)
    }

    pub fn initialize_schema(&self) -> Result<(), DcaError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS prices (
                    symbol TEXT NOT NULL,
                    date TEXT NOT NULL,
                    price REAL NOT NULL,
                    PRIMARY KEY (symbol, date)
                );
                CREATE INDEX IF NOT EXISTS idx_prices_date ON prices(date);",
            )
            .map_err(query_err)
    }

    /// Inserts or replaces prices for `symbol` in a single transaction.
    pub fn insert_prices(&self, symbol: &str, points: &[PricePoint]) -> Result<(), DcaError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        for point in points {
            tx.execute(
                "INSERT OR REPLACE INTO prices (symbol, date, price) VALUES (?1, ?2, ?3)",
                params![
                    symbol,
                    point.date.format(DATE_FORMAT).to_string(),
                    point.price
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        debug!(symbol, rows = points.len(), "stored prices");
        Ok(())
    }
}

impl PriceDataPort for SqliteAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<PricePoint>, DcaError> {
        let conn = self.conn()?;

        let start_str = start_date.format(DATE_FORMAT).to_string();
        let end_str = end_date.format(DATE_FORMAT).to_string();

        let mut stmt = conn
            .prepare(
                "SELECT date, price FROM prices
                 WHERE symbol = ?1 AND date >= ?2 AND date < ?3
                 ORDER BY date ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![symbol, start_str, end_str], |row| {
                let date = parse_row_date(row.get(0)?)?;
                Ok(PricePoint::new(date, row.get(1)?))
            })
            .map_err(query_err)?;

        let mut points = Vec::new();
        for row in rows {
            let point = row.map_err(query_err)?;
            if !point.price.is_nan() {
                points.push(point);
            }
        }

        debug!(symbol, points = points.len(), %interval, "read sqlite prices");
        Ok(apply_interval(normalize_series(points), interval))
    }

    fn list_symbols(&self) -> Result<Vec<String>, DcaError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM prices ORDER BY symbol")
            .map_err(query_err)?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_err)?;

        let mut symbols = Vec::new();
        for row in rows {
            symbols.push(row.map_err(query_err)?);
        }
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError> {
        let conn = self.conn()?;
        let (min, max, count): (Option<String>, Option<String>, i64) = conn
            .query_row(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM prices WHERE symbol = ?1",
                params![symbol],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_err)?;

        match (min, max) {
            (Some(min), Some(max)) if count > 0 => {
                let min = parse_row_date(min).map_err(query_err)?;
                let max = parse_row_date(max).map_err(query_err)?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}
