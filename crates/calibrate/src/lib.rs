//! # zrcal-calibrate
//!
//! Calibration of the radar reflectivity / rain rate power law
//! `Z = a * R^b` by bounded least squares.
//!
//! ```ignore
//! use zrcal_calibrate::{CalibrationConfig, calibrate};
//!
//! let fit = calibrate(&z, &r, &CalibrationConfig::new())?;
//! println!("Z = {:.1} R^{:.3}", fit.a(), fit.b());
//! ```
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | a | [`PowerLawFit::a()`] | Multiplicative coefficient, unbounded |
//! | b | [`PowerLawFit::b()`] | Exponent, kept within the configured bounds |
//! | MSE | [`PowerLawFit::mse()`] | Mean squared residual in linear Z units |

mod config;
mod error;
mod fit;
mod optimizer;

pub(crate) mod params;

pub use config::CalibrationConfig;
pub use error::CalibrationError;
pub use fit::PowerLawFit;
pub use optimizer::calibrate;
