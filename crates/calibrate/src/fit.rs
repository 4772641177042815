//! Fitted power-law relationship.

/// Result of calibrating `Z = a * R^b`.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerLawFit {
    a: f64,
    b: f64,
    mse: f64,
    n_samples: usize,
    iterations: u64,
    converged: bool,
}

impl PowerLawFit {
    pub(crate) fn new(
        a: f64,
        b: f64,
        mse: f64,
        n_samples: usize,
        iterations: u64,
        converged: bool,
    ) -> Self {
        Self {
            a,
            b,
            mse,
            n_samples,
            iterations,
            converged,
        }
    }

    /// Multiplicative coefficient.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Exponent.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Mean squared reflectivity residual at the reported minimum.
    pub fn mse(&self) -> f64 {
        self.mse
    }

    /// Number of rainfall samples used in the fit.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Solver iterations performed.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Whether the solver met its own convergence criterion before the
    /// iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Predicted reflectivity (linear Z) for a rain rate in mm/h.
    pub fn reflectivity(&self, rain_rate: f64) -> f64 {
        self.a * rain_rate.powf(self.b)
    }

    /// Rain rate in mm/h implied by a reflectivity in linear Z.
    pub fn rain_rate(&self, reflectivity: f64) -> f64 {
        (reflectivity / self.a).powf(1.0 / self.b)
    }
}
