//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dcasim.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("no price data in series")]
    EmptySeries,

    #[error("invalid contribution amount {amount}: must be a positive number")]
    InvalidAmount { amount: f64 },

    #[error("invalid price {price} on {date}: prices must be positive")]
    InvalidPrice { date: NaiveDate, price: f64 },

    #[error("price series out of order: {next} does not follow {previous}")]
    UnsortedSeries { previous: NaiveDate, next: NaiveDate },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DcaError {
    /// True for errors caused by the inputs of a simulation rather than by
    /// the environment (data source, filesystem).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DcaError::EmptySeries
                | DcaError::InvalidAmount { .. }
                | DcaError::InvalidPrice { .. }
                | DcaError::UnsortedSeries { .. }
        )
    }
}

impl DcaError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DcaError::Io(_) | DcaError::Report { .. } => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. } => 2,
            DcaError::Database { .. } | DcaError::DatabaseQuery { .. } => 3,
            DcaError::InvalidAmount { .. }
            | DcaError::InvalidPrice { .. }
            | DcaError::UnsortedSeries { .. } => 4,
            DcaError::EmptySeries => 5,
        }
    }
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
