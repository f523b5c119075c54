use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the bike sharing dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The input dataset could not be opened or read from disk.
    #[error("Failed to read dataset {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row held a value that could not be parsed into its typed field.
    #[error("Parse error on line {line}, column '{column}': {message}")]
    Parse {
        line: u64,
        column: String,
        message: String,
    },

    /// A required column is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The requested start date lies after the end date.
    ///
    /// The range filter never raises this; it is only produced by
    /// [`crate::models::DateRange::validate`] so the UI can label the empty
    /// result.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The CSV reader failed below the record level (bad quoting, UTF-8, …).
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Terminal I/O failure in the interactive dashboard.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// `true` for errors that must abort startup.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DashboardError::InvalidRange { .. })
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
