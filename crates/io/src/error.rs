//! Error types for zrcal-io.

use std::path::PathBuf;

use zrcal_events::EventError;

/// Error type for all fallible operations in the zrcal-io crate.
///
/// Covers missing files, Parquet and Arrow failures, tables whose layout
/// does not match the wide station format, and table invariants rejected
/// by `zrcal-events`.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a file's columns do not match the expected layout.
    #[error("schema error: {reason}")]
    Schema {
        /// Description of the mismatch.
        reason: String,
    },

    /// Returned when a time value is null or out of range.
    #[error("invalid time at row {row}: {reason}")]
    InvalidTime {
        /// Row index of the offending value.
        row: usize,
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Returned when a reader or writer configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Which setting was rejected.
        reason: String,
    },

    /// Returned when the loaded columns violate a station table invariant.
    #[error("station table: {0}")]
    Table(#[from] EventError),
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}
