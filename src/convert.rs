//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::*;

use zrcal_calibrate::CalibrationConfig;
use zrcal_events::{SegmentConfig, TemporalResolution};
use zrcal_io::{Compression, ReaderConfig, WriterConfig};

/// Parses a temporal resolution name into the corresponding enum variant.
///
/// "6min" pairs ten radar scans with each gauge step; "60min" and "1H" are
/// one-to-one.
pub fn parse_resolution(s: &str) -> Result<TemporalResolution> {
    match s.to_lowercase().as_str() {
        "6min" => Ok(TemporalResolution::SixMinute),
        "60min" | "1h" => Ok(TemporalResolution::Hourly),
        other => bail!("unknown temporal resolution: {other:?}"),
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoConfig) -> ReaderConfig {
    ReaderConfig::default().with_time_column(&io.time_column)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoConfig) -> Result<WriterConfig> {
    let compression: Compression = io.compression.parse()?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size))
}

/// Builds a validated [`SegmentConfig`] from the TOML events configuration.
pub fn build_segment_config(events: &EventsToml) -> Result<SegmentConfig> {
    let resolution = parse_resolution(&events.temporal_resolution)?;
    let cfg = SegmentConfig::new(events.max_gap)
        .with_min_rain_threshold(events.min_rain_threshold)
        .with_resolution(resolution);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a validated [`CalibrationConfig`] from the TOML calibration
/// configuration.
pub fn build_calibration_config(cal: &CalibrationToml) -> Result<CalibrationConfig> {
    let [lo, hi] = cal.b_bounds;
    let cfg = CalibrationConfig::new()
        .with_initial_guess(cal.a_guess, cal.b_guess)
        .with_b_bounds(lo, hi)
        .with_max_iters(cal.max_iters)
        .with_sd_tolerance(cal.sd_tolerance);
    cfg.validate()?;
    Ok(cfg)
}
