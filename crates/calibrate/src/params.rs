/// Maps a free parameter onto the open interval `(lo, hi)`.
///
/// Uses the logistic function, so `u = 0` lands on the midpoint and the
/// bounds are approached but never crossed.
pub(crate) fn free_to_bounded(u: f64, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) / (1.0 + (-u).exp())
}

/// Inverse of [`free_to_bounded`].
///
/// `b` is first clamped to the central 90% of the interval so that a guess
/// on (or beyond) a bound still maps to a point where the logistic curve
/// has a usable slope.
pub(crate) fn bounded_to_free(b: f64, lo: f64, hi: f64) -> f64 {
    let margin = 0.05 * (hi - lo);
    let p = (b.clamp(lo + margin, hi - margin) - lo) / (hi - lo);
    (p / (1.0 - p)).ln()
}
