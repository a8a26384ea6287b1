//! Calendar periods and provider sampling intervals.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Calendar granularity used to bucket a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeriodUnit {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

/// Identifies one calendar period: a year plus an ordinal within it.
///
/// Keys order chronologically for any one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey(pub i32, pub u32);

impl PeriodUnit {
    /// The period containing `date`. Weeks are ISO weeks (Monday start).
    pub fn key(self, date: NaiveDate) -> PeriodKey {
        match self {
            PeriodUnit::Day => PeriodKey(date.year(), date.ordinal()),
            PeriodUnit::Week => {
                let week = date.iso_week();
                PeriodKey(week.year(), week.week())
            }
            PeriodUnit::Month => PeriodKey(date.year(), date.month()),
            PeriodUnit::Quarter => PeriodKey(date.year(), date.month0() / 3 + 1),
            PeriodUnit::Year => PeriodKey(date.year(), 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodUnit::Day => "day",
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Quarter => "quarter",
            PeriodUnit::Year => "year",
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(PeriodUnit::Day),
            "week" | "weekly" | "w" => Ok(PeriodUnit::Week),
            "month" | "monthly" | "m" => Ok(PeriodUnit::Month),
            "quarter" | "quarterly" | "q" => Ok(PeriodUnit::Quarter),
            "year" | "yearly" | "annual" | "y" => Ok(PeriodUnit::Year),
            other => Err(format!(
                "unknown period '{other}' (expected day, week, month, quarter or year)"
            )),
        }
    }
}

/// Sampling interval requested from a price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    /// Period unit a provider holding daily rows thins its output to.
    pub fn period_unit(self) -> PeriodUnit {
        match self {
            Interval::Daily => PeriodUnit::Day,
            Interval::Weekly => PeriodUnit::Week,
            Interval::Monthly => PeriodUnit::Month,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "daily" => Ok(Interval::Daily),
            "1wk" | "weekly" => Ok(Interval::Weekly),
            "1mo" | "monthly" => Ok(Interval::Monthly),
            other => Err(format!(
                "unknown interval '{other}' (expected 1d, 1wk or 1mo)"
            )),
        }
    }
}
