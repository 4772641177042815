//! Error types for the zrcal-events crate.

use chrono::NaiveDateTime;

/// Error type for all fallible operations in the zrcal-events crate.
///
/// Covers misaligned gauge/radar inputs, malformed station tables, and
/// caller precondition violations such as merging an empty event list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// Returned when the reflectivity sample count does not match the
    /// configured ratio to the rainfall sample count.
    #[error("reflectivity/rainfall mismatch ({context}): expected {expected} reflectivity samples, got {got}")]
    Consistency {
        /// Where the mismatch was detected (station and window, or dataset).
        context: String,
        /// Number of reflectivity samples implied by the rainfall samples.
        expected: usize,
        /// Number of reflectivity samples found.
        got: usize,
    },

    /// Returned when an event list to merge is empty.
    #[error("cannot merge an empty event list")]
    EmptyInput,

    /// Returned when a station is not present in a table.
    #[error("station '{station}' not found")]
    UnknownStation {
        /// Name of the missing station.
        station: String,
    },

    /// Returned when a station appears twice in one table.
    #[error("duplicate station '{station}'")]
    DuplicateStation {
        /// Name of the repeated station.
        station: String,
    },

    /// Returned when a series has an unexpected length.
    #[error("length mismatch for '{name}': expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the offending series.
        name: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when timestamps are not strictly increasing.
    #[error("timestamps not strictly increasing at index {index}")]
    UnorderedTimestamps {
        /// Index of the first out-of-order timestamp.
        index: usize,
    },

    /// Returned when an event would end at or before its start.
    #[error("invalid event window: end {end} is not after start {start}")]
    InvalidWindow {
        /// Event start.
        start: NaiveDateTime,
        /// Event end.
        end: NaiveDateTime,
    },

    /// Returned when a segmentation parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the offending parameter.
        reason: String,
    },
}
