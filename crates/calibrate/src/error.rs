//! Error types for the zrcal-calibrate crate.

/// Error type for all fallible operations in the zrcal-calibrate crate.
///
/// Covers validation of the sample arrays and configuration, and failure
/// of the underlying optimiser to report a best parameter set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    /// Returned when no samples are supplied.
    #[error("no calibration samples")]
    EmptyData,

    /// Returned when the reflectivity length is not a positive multiple of
    /// the rainfall length.
    #[error("reflectivity length {z} is not a multiple of rainfall length {r}")]
    LengthMismatch {
        /// Number of reflectivity values.
        z: usize,
        /// Number of rainfall values.
        r: usize,
    },

    /// Returned when a sample is NaN or infinite.
    #[error("calibration samples contain non-finite values")]
    NonFiniteData,

    /// Returned when a rainfall sample is negative.
    #[error("negative rainfall value: {value}")]
    NegativeRainfall {
        /// The offending value.
        value: f64,
    },

    /// Returned when the exponent bounds are not a finite, increasing pair.
    #[error("invalid exponent bounds [{lo}, {hi}]")]
    InvalidBounds {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },

    /// Returned when an initial guess or solver setting is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the offending setting.
        reason: String,
    },

    /// Returned when the optimiser fails to produce a parameter set.
    #[error("optimisation failed: {reason}")]
    OptimizationFailed {
        /// Description of the solver failure.
        reason: String,
    },
}
