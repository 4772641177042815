//! Calibrate command: fit the Z-R power law per calendar year.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use zrcal_calibrate::{CalibrationConfig, CalibrationError, PowerLawFit, calibrate};
use zrcal_events::SampleSet;

use crate::cli::CalibrateArgs;
use crate::config::ZrcalConfig;
use crate::convert;
use crate::pipeline;

/// Fitted parameters of one calendar year.
#[derive(Debug, Serialize)]
struct YearFit {
    year: i32,
    a: f64,
    b: f64,
    mse: f64,
    n_samples: usize,
    n_events: usize,
    iterations: u64,
    converged: bool,
}

/// Calibration report written as JSON.
#[derive(Debug, Serialize)]
struct Report {
    b_bounds: [f64; 2],
    use_row_means: bool,
    years: Vec<YearFit>,
}

/// Run the per-year calibration pipeline.
pub fn run(args: CalibrateArgs) -> Result<()> {
    let _cmd = info_span!("calibrate").entered();
    let config = ZrcalConfig::load(&args.config)?;
    let cal_cfg = convert::build_calibration_config(&config.calibration)?;

    let (rain, radar) = pipeline::load_tables(&config)?;
    let years = pipeline::assemble_years(&config, &rain, &radar, args.year)?;

    let mut fits = Vec::with_capacity(years.len());
    for year in &years {
        let _span = info_span!("year", year = year.year).entered();
        let samples = &year.dataset.samples;
        if samples.is_empty() {
            warn!("no clean samples, skipping");
            continue;
        }

        let fit = fit_samples(
            samples,
            &cal_cfg,
            config.calibration.use_row_means,
            config.calibration.refits,
        )
        .with_context(|| format!("calibration failed for {}", year.year))?;
        info!(
            a = fit.a(),
            b = fit.b(),
            mse = fit.mse(),
            converged = fit.converged(),
            "year calibrated"
        );

        fits.push(YearFit {
            year: year.year,
            a: fit.a(),
            b: fit.b(),
            mse: fit.mse(),
            n_samples: fit.n_samples(),
            n_events: year.dataset.events.len(),
            iterations: fit.iterations(),
            converged: fit.converged(),
        });
    }

    let report = Report {
        b_bounds: config.calibration.b_bounds,
        use_row_means: config.calibration.use_row_means,
        years: fits,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;

    match args.output.or(config.io.report) {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Fits one year's samples, either against every radar sub-sample or
/// against the row means.
fn fit_samples(
    samples: &SampleSet,
    config: &CalibrationConfig,
    use_row_means: bool,
    refits: usize,
) -> Result<PowerLawFit, CalibrationError> {
    if use_row_means {
        fit_with_refits(&samples.row_means(), samples.r(), config, refits)
    } else {
        fit_with_refits(samples.z(), samples.r(), config, refits)
    }
}

/// Calibrates, then restarts from the previous result while the solver
/// reports no convergence, at most `refits` times.
fn fit_with_refits(
    z: &[f64],
    r: &[f64],
    config: &CalibrationConfig,
    refits: usize,
) -> Result<PowerLawFit, CalibrationError> {
    let mut fit = calibrate(z, r, config)?;
    for attempt in 1..=refits {
        if fit.converged() {
            break;
        }
        debug!(attempt, a = fit.a(), b = fit.b(), "refitting from previous result");
        let restart = config.clone().with_initial_guess(fit.a(), fit.b());
        fit = calibrate(z, r, &restart)?;
    }
    Ok(fit)
}
