//! Dataset assembly: segmentation across stations, merging, and cleaning
//! of the paired reflectivity/rainfall samples used for calibration.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SegmentConfig;
use crate::error::EventError;
use crate::event::Event;
use crate::merge::merge_overlapping;
use crate::segment::{StationEvents, segment_station};
use crate::table::StationTable;

// ---------------------------------------------------------------------------
// SampleSet
// ---------------------------------------------------------------------------

/// Co-indexed reflectivity rows and rainfall values.
///
/// Reflectivity is stored flat, row-major, with `ratio` sub-samples per
/// rainfall value.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    ratio: usize,
    z: Vec<f64>,
    r: Vec<f64>,
}

impl SampleSet {
    /// Reshapes flat reflectivity into rows of `ratio` and pairs them with
    /// `r`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Consistency`] if `z.len() != ratio * r.len()`,
    /// and [`EventError::InvalidConfig`] if `ratio` is zero.
    pub fn new(ratio: usize, z: Vec<f64>, r: Vec<f64>) -> Result<Self, EventError> {
        if ratio == 0 {
            return Err(EventError::InvalidConfig {
                reason: "sample ratio must be positive".to_string(),
            });
        }
        if z.len() != ratio * r.len() {
            return Err(EventError::Consistency {
                context: "dataset".to_string(),
                expected: ratio * r.len(),
                got: z.len(),
            });
        }
        Ok(Self { ratio, z, r })
    }

    /// Reflectivity sub-samples per rainfall value.
    pub fn ratio(&self) -> usize {
        self.ratio
    }

    /// Flat reflectivity sub-samples.
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Rainfall values.
    pub fn r(&self) -> &[f64] {
        &self.r
    }

    /// Number of sample pairs.
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Iterator over reflectivity rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.z.chunks_exact(self.ratio)
    }

    /// Mean reflectivity of each row.
    pub fn row_means(&self) -> Vec<f64> {
        self.rows().map(zrcal_stats::mean).collect()
    }

    /// Keeps only the pairs for which `keep(row, r)` returns `true`.
    ///
    /// Returns the number of pairs removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&[f64], f64) -> bool) -> usize {
        let before = self.r.len();
        let mut z = Vec::with_capacity(self.z.len());
        let mut r = Vec::with_capacity(self.r.len());
        for (row, &value) in self.z.chunks_exact(self.ratio).zip(self.r.iter()) {
            if keep(row, value) {
                z.extend_from_slice(row);
                r.push(value);
            }
        }
        self.z = z;
        self.r = r;
        before - self.r.len()
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Cleaning rule applied to sample pairs before calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFilter {
    /// Drops pairs with any reflectivity sub-sample exactly zero.
    ZeroReflectivity,
    /// Drops pairs with any NaN reflectivity sub-sample.
    NanReflectivity,
    /// Drops pairs whose rainfall is exactly zero.
    ZeroRainfall,
    /// Drops pairs whose rainfall is NaN.
    NanRainfall,
}

impl SampleFilter {
    /// Filters in the order they are applied during assembly.
    pub const ALL: [SampleFilter; 4] = [
        Self::ZeroReflectivity,
        Self::NanReflectivity,
        Self::ZeroRainfall,
        Self::NanRainfall,
    ];

    /// Returns `true` if the pair passes this filter.
    pub fn keeps(self, row: &[f64], r: f64) -> bool {
        match self {
            Self::ZeroReflectivity => row.iter().all(|&z| z != 0.0),
            Self::NanReflectivity => row.iter().all(|z| !z.is_nan()),
            Self::ZeroRainfall => r != 0.0,
            Self::NanRainfall => !r.is_nan(),
        }
    }
}

/// Applies every [`SampleFilter`] in order, logging how many pairs each drops.
pub fn clean_samples(samples: &mut SampleSet) {
    for filter in SampleFilter::ALL {
        let dropped = samples.retain(|row, r| filter.keeps(row, r));
        debug!(?filter, dropped, remaining = samples.len(), "applied sample filter");
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Output of [`assemble`] for one analysis period.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Merged, time-sorted events.
    pub events: Vec<Event>,
    /// Cleaned calibration samples.
    pub samples: SampleSet,
}

/// Runs the segmenter on every rainfall column.
///
/// Stations are processed in parallel; results come back in column order.
///
/// # Errors
///
/// Returns an [`EventError`] if segmentation fails for any station.
pub fn segment_stations(
    rain: &StationTable,
    reflectivity: &StationTable,
    config: &SegmentConfig,
) -> Result<Vec<StationEvents>, EventError> {
    let columns: Vec<(&str, &[f64])> = rain.iter().collect();
    columns
        .par_iter()
        .map(|(station, values)| {
            segment_station(station, values, rain.timestamps(), reflectivity, config)
        })
        .collect()
}

/// Extracts events and cleaned calibration samples for one analysis period.
///
/// Per-station events are concatenated in column order. Events whose
/// reflectivity summary is undefined are dropped, and the remainder is
/// merged across stations when more than one event exists. The flat
/// samples of all stations are reshaped into rows of `ratio` sub-samples
/// and cleaned with [`clean_samples`].
///
/// # Errors
///
/// Returns [`EventError`] from segmentation, merging, or the reshape step
/// ([`EventError::Consistency`]).
#[tracing::instrument(skip_all, fields(n_stations = rain.n_stations(), n_steps = rain.n_timesteps()))]
pub fn assemble(
    rain: &StationTable,
    reflectivity: &StationTable,
    config: &SegmentConfig,
) -> Result<Dataset, EventError> {
    let per_station = segment_stations(rain, reflectivity, config)?;

    let mut events = Vec::new();
    let mut z = Vec::new();
    let mut r = Vec::new();
    for station in per_station {
        events.extend(station.events);
        z.extend(station.reflectivity);
        r.extend(station.rainfall);
    }

    let n_single = events.len();
    events.retain(|e| !e.reflectivity().is_nan());
    if events.len() < n_single {
        debug!(
            dropped = n_single - events.len(),
            "dropped events without reflectivity"
        );
    }

    if events.len() > 1 {
        events = merge_overlapping(events)?;
    }

    let mut samples = SampleSet::new(config.resolution().ratio(), z, r)?;
    clean_samples(&mut samples);

    info!(
        n_single,
        n_events = events.len(),
        n_samples = samples.len(),
        "dataset assembled"
    );
    Ok(Dataset { events, samples })
}
