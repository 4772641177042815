//! Configuration for event segmentation.

use crate::error::EventError;

/// Ratio between radar and gauge sampling rates.
///
/// The ratio is the number of reflectivity sub-samples expected for every
/// rainfall sample and is used to validate that the two inputs line up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemporalResolution {
    /// 6-minute radar against 60-minute gauge data (10 sub-samples).
    #[default]
    SixMinute,
    /// Radar and gauge both sampled hourly (1 sub-sample).
    Hourly,
}

impl TemporalResolution {
    /// Number of reflectivity sub-samples per rainfall sample.
    pub fn ratio(self) -> usize {
        match self {
            Self::SixMinute => 10,
            Self::Hourly => 1,
        }
    }
}

/// Configuration for single-station segmentation and dataset assembly.
///
/// # Example
///
/// ```
/// use zrcal_events::{SegmentConfig, TemporalResolution};
///
/// let config = SegmentConfig::new(3)
///     .with_min_rain_threshold(0.2)
///     .with_resolution(TemporalResolution::Hourly);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    max_gap: usize,
    min_rain_threshold: f64,
    resolution: TemporalResolution,
}

impl SegmentConfig {
    /// Creates a configuration tolerating `max_gap` consecutive dry steps.
    ///
    /// Defaults: `min_rain_threshold = 0.1`, `resolution = SixMinute`.
    pub fn new(max_gap: usize) -> Self {
        Self {
            max_gap,
            min_rain_threshold: 0.1,
            resolution: TemporalResolution::default(),
        }
    }

    /// Sets the rainfall intensity at or above which a step counts as wet.
    pub fn with_min_rain_threshold(mut self, threshold: f64) -> Self {
        self.min_rain_threshold = threshold;
        self
    }

    /// Sets the radar/gauge temporal resolution mode.
    pub fn with_resolution(mut self, resolution: TemporalResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Maximum number of consecutive dry steps inside one event.
    pub fn max_gap(&self) -> usize {
        self.max_gap
    }

    /// Wet-step threshold in mm/h.
    pub fn min_rain_threshold(&self) -> f64 {
        self.min_rain_threshold
    }

    /// Radar/gauge temporal resolution mode.
    pub fn resolution(&self) -> TemporalResolution {
        self.resolution
    }

    /// Validates this configuration.
    ///
    /// The threshold must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), EventError> {
        if !self.min_rain_threshold.is_finite() || self.min_rain_threshold <= 0.0 {
            return Err(EventError::InvalidConfig {
                reason: format!(
                    "min_rain_threshold must be finite and positive, got {}",
                    self.min_rain_threshold
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn defaults() {
        let cfg = SegmentConfig::new(2);
        assert_eq!(cfg.max_gap(), 2);
        assert_abs_diff_eq!(cfg.min_rain_threshold(), 0.1, epsilon = f64::EPSILON);
        assert_eq!(cfg.resolution(), TemporalResolution::SixMinute);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn ratios() {
        assert_eq!(TemporalResolution::SixMinute.ratio(), 10);
        assert_eq!(TemporalResolution::Hourly.ratio(), 1);
    }

    #[test]
    fn rejects_bad_threshold() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = SegmentConfig::new(1).with_min_rain_threshold(bad);
            assert!(matches!(
                cfg.validate(),
                Err(EventError::InvalidConfig { .. })
            ));
        }
    }
}
