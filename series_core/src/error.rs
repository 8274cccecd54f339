use crate::models::DateInterval;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeriesError>;

/// Errors raised while loading, filtering or joining a source.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// The path is not valid UTF-8 text.
    #[error("dataset path must be text, got {0:?}")]
    NonTextualPath(PathBuf),

    #[error("File not found at: {0}")]
    FileNotFound(String),

    /// The file exists but could not be opened.
    #[error("File not readable at: {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Filtering or joining left zero rows.
    #[error("No data found within the specified date range: {interval}")]
    EmptyResult { interval: DateInterval },

    #[error("column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },

    /// An interval bound or a date cell that does not match its format.
    #[error("invalid date '{value}', expected format {format}")]
    InvalidDate { value: String, format: String },

    #[error("invalid source config {path}: {reason}")]
    Config { path: String, reason: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl SeriesError {
    /// Path was unusable before any data was read.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SeriesError::NonTextualPath(_)
                | SeriesError::FileNotFound(_)
                | SeriesError::Unreadable { .. }
        )
    }
}
