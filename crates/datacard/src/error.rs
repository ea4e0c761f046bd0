//! Error types for the DataCard library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for DataCard operations.
#[derive(Debug, Error)]
pub enum DataCardError {
    /// Empty dataset or no records to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Caller-supplied field schema is malformed.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Analysis options are out of range.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A record could not be interpreted as a field mapping.
    #[error("Invalid record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Unexpected failure while analyzing the batch.
    #[error("Analysis failed: {0}")]
    Computation(String),
}

impl DataCardError {
    /// Returns true if the error was caused by the caller's input rather than
    /// by the analysis itself.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DataCardError::EmptyData(_)
                | DataCardError::InvalidSchema(_)
                | DataCardError::InvalidOptions(_)
                | DataCardError::InvalidRecord { .. }
                | DataCardError::Json(_)
        )
    }
}

/// Result type alias for DataCard operations.
pub type Result<T> = std::result::Result<T, DataCardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(DataCardError::EmptyData("no records".into()).is_validation());
        assert!(DataCardError::InvalidSchema("dup".into()).is_validation());
        assert!(!DataCardError::Computation("boom".into()).is_validation());
        assert!(!DataCardError::UnsupportedFormat("xlsx".into()).is_validation());
    }
}
