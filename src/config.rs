use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level zrcal configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZrcalConfig {
    /// I/O settings.
    pub io: IoConfig,

    /// Event segmentation settings.
    #[serde(default)]
    pub events: EventsToml,

    /// Power-law calibration settings.
    #[serde(default)]
    pub calibration: CalibrationToml,
}

impl ZrcalConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    /// Wide Parquet table of rain-gauge intensity (mm/h).
    pub rain: PathBuf,
    /// Wide Parquet table of radar reflectivity (linear units).
    pub radar: PathBuf,
    #[serde(default = "default_time_column")]
    pub time_column: String,
    pub events: Option<PathBuf>,
    pub report: Option<PathBuf>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

fn default_time_column() -> String {
    "time".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    100_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsToml {
    /// Dry steps tolerated inside an event.
    #[serde(default = "default_max_gap")]
    pub max_gap: usize,
    #[serde(default = "default_min_rain_threshold")]
    pub min_rain_threshold: f64,
    /// "6min" (ten radar scans per gauge step) or "60min"/"1H".
    #[serde(default = "default_temporal_resolution")]
    pub temporal_resolution: String,
}

impl Default for EventsToml {
    fn default() -> Self {
        Self {
            max_gap: default_max_gap(),
            min_rain_threshold: default_min_rain_threshold(),
            temporal_resolution: default_temporal_resolution(),
        }
    }
}

fn default_max_gap() -> usize {
    2
}
fn default_min_rain_threshold() -> f64 {
    0.1
}
fn default_temporal_resolution() -> String {
    "6min".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationToml {
    #[serde(default = "default_a_guess")]
    pub a_guess: f64,
    #[serde(default = "default_b_guess")]
    pub b_guess: f64,
    #[serde(default = "default_b_bounds")]
    pub b_bounds: [f64; 2],
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
    /// Extra fits started from the previous result while unconverged.
    #[serde(default = "default_refits")]
    pub refits: usize,
    /// Fit each rain sample against its mean reflectivity instead of every
    /// radar sub-sample.
    #[serde(default)]
    pub use_row_means: bool,
}

impl Default for CalibrationToml {
    fn default() -> Self {
        Self {
            a_guess: default_a_guess(),
            b_guess: default_b_guess(),
            b_bounds: default_b_bounds(),
            max_iters: default_max_iters(),
            sd_tolerance: default_sd_tolerance(),
            refits: default_refits(),
            use_row_means: false,
        }
    }
}

fn default_a_guess() -> f64 {
    400.0
}
fn default_b_guess() -> f64 {
    1.6
}
fn default_b_bounds() -> [f64; 2] {
    [1.5, 1.6]
}
fn default_max_iters() -> u64 {
    2000
}
fn default_sd_tolerance() -> f64 {
    1e-8
}
fn default_refits() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: ZrcalConfig = toml::from_str(
            r#"
            [io]
            rain = "rain.parquet"
            radar = "radar.parquet"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.io.rain, PathBuf::from("rain.parquet"));
        assert_eq!(cfg.io.time_column, "time");
        assert_eq!(cfg.io.compression, "snappy");
        assert_eq!(cfg.events.max_gap, 2);
        assert_eq!(cfg.events.min_rain_threshold, 0.1);
        assert_eq!(cfg.events.temporal_resolution, "6min");
        assert_eq!(cfg.calibration.a_guess, 400.0);
        assert_eq!(cfg.calibration.b_bounds, [1.5, 1.6]);
        assert!(!cfg.calibration.use_row_means);
    }

    #[test]
    fn full_config() {
        let cfg: ZrcalConfig = toml::from_str(
            r#"
            [io]
            rain = "in/rain.parquet"
            radar = "in/radar.parquet"
            events = "out/events.parquet"
            report = "out/fit.json"
            compression = "zstd"

            [events]
            max_gap = 0
            min_rain_threshold = 0.5
            temporal_resolution = "60min"

            [calibration]
            a_guess = 200.0
            b_guess = 1.5
            b_bounds = [1.2, 2.0]
            max_iters = 500
            refits = 0
            use_row_means = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.io.events, Some(PathBuf::from("out/events.parquet")));
        assert_eq!(cfg.events.max_gap, 0);
        assert_eq!(cfg.events.temporal_resolution, "60min");
        assert_eq!(cfg.calibration.b_bounds, [1.2, 2.0]);
        assert_eq!(cfg.calibration.refits, 0);
        assert!(cfg.calibration.use_row_means);
    }

    #[test]
    fn unknown_field_rejected() {
        let result: Result<ZrcalConfig, _> = toml::from_str(
            r#"
            [io]
            rain = "rain.parquet"
            radar = "radar.parquet"

            [events]
            max_gaps = 3
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zrcal.toml");
        std::fs::write(
            &path,
            "[io]\nrain = \"r.parquet\"\nradar = \"z.parquet\"\n\n[calibration]\nrefits = 5\n",
        )
        .unwrap();

        let cfg = ZrcalConfig::load(&path).unwrap();
        assert_eq!(cfg.io.radar, PathBuf::from("z.parquet"));
        assert_eq!(cfg.calibration.refits, 5);
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = ZrcalConfig::load(Path::new("/nonexistent/zrcal.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/zrcal.toml"));
    }

    #[test]
    fn io_section_required() {
        let result: Result<ZrcalConfig, _> = toml::from_str("[events]\nmax_gap = 1\n");
        assert!(result.is_err());
    }
}
