//! Summary statistics for the zrcal event pipeline.
//!
//! Rain-gauge and radar series routinely carry missing values encoded as
//! NaN, and the two series need different treatment: a single missing gauge
//! reading invalidates a rainfall summary, while gaps in the radar record are
//! skipped. Both policies live here so callers pick one explicitly.

/// Arithmetic mean of a slice.
///
/// Returns NaN for an empty slice, and NaN propagates from any element.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Weighted mean of two values.
///
/// When both weights are zero the plain arithmetic mean is returned, so two
/// zero-length intervals still combine to a finite value.
pub fn weighted_mean(a: f64, weight_a: f64, b: f64, weight_b: f64) -> f64 {
    let total = weight_a + weight_b;
    if total == 0.0 {
        return (a + b) / 2.0;
    }
    (a * weight_a + b * weight_b) / total
}

/// Minimum, mean and maximum of a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Smallest sample.
    pub min: f64,
    /// Arithmetic mean.
    pub avg: f64,
    /// Largest sample.
    pub max: f64,
}

impl Summary {
    /// A summary with every field NaN.
    pub const NAN: Summary = Summary {
        min: f64::NAN,
        avg: f64::NAN,
        max: f64::NAN,
    };

    /// Summarises `data`, letting any NaN poison all three fields.
    ///
    /// Empty input yields [`Summary::NAN`].
    pub fn strict(data: &[f64]) -> Self {
        if data.is_empty() || data.iter().any(|x| x.is_nan()) {
            return Self::NAN;
        }
        Self::from_clean(data)
    }

    /// Summarises the non-NaN elements of `data`.
    ///
    /// Yields [`Summary::NAN`] when no element survives.
    pub fn ignoring_nan(data: &[f64]) -> Self {
        let clean: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
        if clean.is_empty() {
            return Self::NAN;
        }
        Self::from_clean(&clean)
    }

    fn from_clean(data: &[f64]) -> Self {
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            min,
            avg: mean(data),
            max,
        }
    }

    /// Returns `true` if any field is NaN.
    pub fn is_nan(&self) -> bool {
        self.min.is_nan() || self.avg.is_nan() || self.max.is_nan()
    }

    /// Combines two summaries: extrema across both, weighted mean of the averages.
    pub fn combine(&self, weight: f64, other: &Summary, other_weight: f64) -> Summary {
        Summary {
            min: self.min.min(other.min),
            avg: weighted_mean(self.avg, weight, other.avg, other_weight),
            max: self.max.max(other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_empty_is_nan() {
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_mean_propagates_nan() {
        assert!(mean(&[1.0, f64::NAN, 3.0]).is_nan());
    }

    #[test]
    fn test_weighted_mean() {
        assert_relative_eq!(weighted_mean(20.0, 2.0, 30.0, 1.0), 70.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_mean_equal_weights_is_arithmetic() {
        assert_eq!(weighted_mean(3.0, 4.0, 5.0, 4.0), 4.0);
    }

    #[test]
    fn test_weighted_mean_zero_weights() {
        assert_eq!(weighted_mean(3.0, 0.0, 5.0, 0.0), 4.0);
    }

    #[test]
    fn test_strict_summary() {
        let s = Summary::strict(&[0.2, 0.3, 0.7]);
        assert_eq!(s.min, 0.2);
        assert_eq!(s.max, 0.7);
        assert_relative_eq!(s.avg, 0.4, epsilon = 1e-12);
        assert!(!s.is_nan());
    }

    #[test]
    fn test_strict_summary_nan_and_empty() {
        assert!(Summary::strict(&[1.0, f64::NAN]).is_nan());
        assert!(Summary::strict(&[]).is_nan());
    }

    #[test]
    fn test_ignoring_nan_summary() {
        let s = Summary::ignoring_nan(&[f64::NAN, 10.0, 30.0]);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.avg, 20.0);
        assert_eq!(s.max, 30.0);

        assert!(Summary::ignoring_nan(&[f64::NAN, f64::NAN]).is_nan());
    }

    #[test]
    fn test_combine() {
        let a = Summary {
            min: 10.0,
            avg: 20.0,
            max: 40.0,
        };
        let b = Summary {
            min: 5.0,
            avg: 30.0,
            max: 35.0,
        };
        let c = a.combine(2.0, &b, 1.0);
        assert_eq!(c.min, 5.0);
        assert_eq!(c.max, 40.0);
        assert_relative_eq!(c.avg, 23.333333333333332, epsilon = 1e-12);
    }
}
