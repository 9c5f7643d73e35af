//! Error types for the data-loader crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - Enum variants for different error cases
//! - `#[from]` conversions so `?` works on I/O and CSV errors

use thiserror::Error;

/// Errors that can occur while loading the raw TMDB dataset
///
/// All of these are fatal for the offline build: a model built from a
/// partially read dataset would silently shift every row index.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// One of the two CSV files is missing
    #[error(
        "Failed to open file: {path} (download the TMDB 5000 dataset from \
         https://www.kaggle.com/datasets/tmdb/tmdb-movie-metadata)"
    )]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected a row (bad quoting, wrong column type, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row was readable but its content was not
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
