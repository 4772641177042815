//! Bounded least-squares fit of the Z-R power law.
//!
//! Wraps the `argmin` crate's Nelder-Mead solver. The exponent `b` is
//! optimised through a logistic reparametrisation (see [`crate::params`]),
//! which keeps every evaluated point inside the bounds; `a` is searched
//! directly.

use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;
use tracing::{debug, warn};

use crate::config::CalibrationConfig;
use crate::error::CalibrationError;
use crate::fit::PowerLawFit;
use crate::params::{bounded_to_free, free_to_bounded};

/// Mean over all sub-samples of `(z - a * r^b)^2`.
///
/// Each `r[i]` is paired with the `ratio` consecutive values of `z`
/// starting at `i * ratio`.
pub(crate) fn mean_squared_error(z: &[f64], r: &[f64], ratio: usize, a: f64, b: f64) -> f64 {
    let mut sum = 0.0;
    for (row, &ri) in z.chunks_exact(ratio).zip(r) {
        let predicted = a * ri.powf(b);
        for &zi in row {
            let d = zi - predicted;
            sum += d * d;
        }
    }
    sum / z.len() as f64
}

/// Fits `Z = a * R^b` by minimising the mean squared reflectivity residual.
///
/// `z` holds `ratio = z.len() / r.len()` reflectivity sub-samples per
/// rainfall value, row-major. Pass one value per rainfall sample (for
/// example row means) for a scalar fit.
///
/// The search is local, starting from the configured guess. Reaching the
/// iteration cap is not an error: the best point found is returned with
/// [`PowerLawFit::converged`] set to `false`.
///
/// # Errors
///
/// Returns [`CalibrationError`] if the configuration or samples are invalid,
/// or if the solver reports no best parameter.
#[tracing::instrument(skip(z, r, config), fields(n_samples = r.len()))]
pub fn calibrate(
    z: &[f64],
    r: &[f64],
    config: &CalibrationConfig,
) -> Result<PowerLawFit, CalibrationError> {
    // 1. Validate
    config.validate()?;
    if r.is_empty() || z.is_empty() {
        return Err(CalibrationError::EmptyData);
    }
    if z.len() % r.len() != 0 {
        return Err(CalibrationError::LengthMismatch {
            z: z.len(),
            r: r.len(),
        });
    }
    if z.iter().chain(r).any(|x| !x.is_finite()) {
        return Err(CalibrationError::NonFiniteData);
    }
    if let Some(&value) = r.iter().find(|&&x| x < 0.0) {
        return Err(CalibrationError::NegativeRainfall { value });
    }
    let ratio = z.len() / r.len();
    let (lo, hi) = config.b_bounds();

    // 2. Initial simplex in (a, u) space
    let a0 = config.a_guess();
    let u0 = bounded_to_free(config.b_guess(), lo, hi);
    let a_step = if a0 == 0.0 { 1.0 } else { 0.1 * a0.abs() };
    let simplex = vec![vec![a0, u0], vec![a0 + a_step, u0], vec![a0, u0 - 1.0]];

    // 3. Run Nelder-Mead
    let cost = PowerLawCost {
        z,
        r,
        ratio,
        bounds: (lo, hi),
    };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(config.sd_tolerance())
        .map_err(|e| CalibrationError::OptimizationFailed {
            reason: e.to_string(),
        })?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(config.max_iters()))
        .run()
        .map_err(|e| CalibrationError::OptimizationFailed {
            reason: e.to_string(),
        })?;

    // 4. Map the best point back to (a, b)
    let state = result.state();
    let best = state
        .best_param
        .as_ref()
        .ok_or_else(|| CalibrationError::OptimizationFailed {
            reason: "solver returned no parameters".to_string(),
        })?;
    let a = best[0];
    let b = free_to_bounded(best[1], lo, hi);
    let mse = mean_squared_error(z, r, ratio, a, b);
    let converged = matches!(
        state.get_termination_reason(),
        Some(TerminationReason::SolverConverged)
    );
    let iterations = state.get_iter();

    if converged {
        debug!(a, b, mse, iterations, "calibration converged");
    } else {
        warn!(
            a,
            b,
            mse,
            iterations,
            reason = ?state.get_termination_reason(),
            "calibration stopped before convergence"
        );
    }

    Ok(PowerLawFit::new(a, b, mse, r.len(), iterations, converged))
}

/// Cost function for argmin: mean squared residual in `(a, u)` space.
struct PowerLawCost<'a> {
    z: &'a [f64],
    r: &'a [f64],
    ratio: usize,
    bounds: (f64, f64),
}

impl CostFunction for PowerLawCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let a = params[0];
        let b = free_to_bounded(params[1], self.bounds.0, self.bounds.1);
        let mse = mean_squared_error(self.z, self.r, self.ratio, a, b);
        if mse.is_finite() {
            Ok(mse)
        } else {
            Ok(f64::MAX)
        }
    }
}
