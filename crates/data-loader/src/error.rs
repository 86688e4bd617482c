//! Error types for the data-loader crate.
//!
//! Two families live here:
//! - `DataLoadError` for reading and parsing the catalog export on disk
//! - `ProviderError` for failures talking to a metadata or ratings store
//!
//! Keeping them apart lets callers tell "the store is down" from "the
//! payload was malformed" and pick retry vs. fallback deliberately.
//! "No data" is never an error: providers return an empty `Vec`.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A document in a data file couldn't be parsed
    ///
    /// `line` is 1-based for JSON-lines files and 0 for whole-array files.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// The metadata provider could not be queried
    #[error("Metadata provider failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Failures reported by a metadata or ratings provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The backing store could not be reached or read
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The store answered but the payload could not be understood
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// The call did not finish within its deadline
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<DataLoadError> for ProviderError {
    fn from(err: DataLoadError) -> Self {
        match err {
            DataLoadError::ParseError { .. } => ProviderError::Malformed(err.to_string()),
            DataLoadError::Provider(inner) => inner,
            other => ProviderError::Unavailable(other.to_string()),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
