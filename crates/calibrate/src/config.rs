//! Configuration for power-law calibration.

use crate::error::CalibrationError;

/// Configuration for fitting `Z = a * R^b`.
///
/// `a` is unbounded; `b` is kept inside [`b_bounds`](Self::b_bounds).
///
/// # Example
///
/// ```
/// use zrcal_calibrate::CalibrationConfig;
///
/// let config = CalibrationConfig::new()
///     .with_initial_guess(200.0, 1.6)
///     .with_max_iters(5000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    a_guess: f64,
    b_guess: f64,
    b_bounds: (f64, f64),
    max_iters: u64,
    sd_tolerance: f64,
}

impl CalibrationConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `a_guess = 400`, `b_guess = 1.6`, `b_bounds = (1.5, 1.6)`,
    /// `max_iters = 2000`, `sd_tolerance = 1e-8`.
    pub fn new() -> Self {
        Self {
            a_guess: 400.0,
            b_guess: 1.6,
            b_bounds: (1.5, 1.6),
            max_iters: 2000,
            sd_tolerance: 1e-8,
        }
    }

    /// Sets the starting point of the search.
    pub fn with_initial_guess(mut self, a: f64, b: f64) -> Self {
        self.a_guess = a;
        self.b_guess = b;
        self
    }

    /// Sets the closed interval the exponent `b` must stay in.
    pub fn with_b_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.b_bounds = (lo, hi);
        self
    }

    /// Sets the iteration cap of the solver.
    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the simplex cost standard deviation at which the solver stops.
    pub fn with_sd_tolerance(mut self, tol: f64) -> Self {
        self.sd_tolerance = tol;
        self
    }

    pub fn a_guess(&self) -> f64 {
        self.a_guess
    }

    pub fn b_guess(&self) -> f64 {
        self.b_guess
    }

    pub fn b_bounds(&self) -> (f64, f64) {
        self.b_bounds
    }

    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Validates this configuration.
    ///
    /// Bounds must be finite with `lo < hi`; guesses must be finite. A
    /// `b_guess` outside the bounds is accepted and pulled inside.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        let (lo, hi) = self.b_bounds;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(CalibrationError::InvalidBounds { lo, hi });
        }
        if !self.a_guess.is_finite() {
            return Err(CalibrationError::InvalidConfig {
                reason: format!("a_guess must be finite, got {}", self.a_guess),
            });
        }
        if !self.b_guess.is_finite() {
            return Err(CalibrationError::InvalidConfig {
                reason: format!("b_guess must be finite, got {}", self.b_guess),
            });
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance <= 0.0 {
            return Err(CalibrationError::InvalidConfig {
                reason: format!("sd_tolerance must be positive, got {}", self.sd_tolerance),
            });
        }
        Ok(())
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::new()
    }
}
