//! Peak-over-threshold segmentation of a single station's rainfall series.
//!
//! The scan is a two-state machine. While *seeking*, every step below the
//! threshold is skipped; the first wet step opens a candidate. While
//! *accumulating*, wet steps reset the dry counter and dry steps increment
//! it. Once the counter exceeds the gap tolerance `G` at step `j`, the
//! candidate is closed with end index `j - G` (the first dry step of the
//! closing run) and the scan resumes at `j + 1`.

use chrono::NaiveDateTime;
use tracing::{debug, trace};
use zrcal_stats::Summary;

use crate::config::SegmentConfig;
use crate::error::EventError;
use crate::event::Event;
use crate::table::StationTable;

/// Events detected at one station together with the samples that fed them.
///
/// `reflectivity` holds `ratio` sub-samples for every entry in `rainfall`,
/// concatenated in event order.
#[derive(Debug, Clone, PartialEq)]
pub struct StationEvents {
    /// Station the events were detected at.
    pub station: String,
    /// Detected events in time order.
    pub events: Vec<Event>,
    /// Flat reflectivity sub-samples of all events.
    pub reflectivity: Vec<f64>,
    /// Flat rainfall samples of all events.
    pub rainfall: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Seeking,
    Accumulating { start: usize, below: usize },
}

/// Read-only inputs shared by every candidate closed during one scan.
struct Scan<'a> {
    station: &'a str,
    values: &'a [f64],
    timestamps: &'a [NaiveDateTime],
    reflectivity: &'a StationTable,
    ratio: usize,
}

impl Scan<'_> {
    /// Closes the candidate covering `values[start..end]`.
    ///
    /// Candidates whose rainfall mean is undefined are dropped without error.
    fn close(&self, start: usize, end: usize, out: &mut StationEvents) -> Result<(), EventError> {
        let start_time = self.timestamps[start];
        let end_time = self.timestamps[end];
        let rain = &self.values[start..end];

        let rain_summary = Summary::strict(rain);
        if rain_summary.avg.is_nan() {
            trace!(station = self.station, %start_time, %end_time, "discarding candidate with undefined rainfall mean");
            return Ok(());
        }

        let reflect = self.reflectivity.window(self.station, start_time, end_time)?;
        let expected = self.ratio * rain.len();
        if reflect.len() != expected {
            return Err(EventError::Consistency {
                context: format!("station {}, {start_time} to {end_time}", self.station),
                expected,
                got: reflect.len(),
            });
        }

        let event = Event::new(
            start_time,
            end_time,
            vec![self.station.to_string()],
            Summary::ignoring_nan(reflect),
            rain_summary,
        )?;
        trace!(station = self.station, %start_time, %end_time, "event closed");

        out.events.push(event);
        out.reflectivity.extend_from_slice(reflect);
        out.rainfall.extend_from_slice(rain);
        Ok(())
    }
}

/// Extracts rainfall events from one station's intensity series.
///
/// `values` and `timestamps` must be co-indexed. Reflectivity for each
/// event is looked up in the `reflectivity` table under the same station
/// name, over `[start, end)`.
///
/// A candidate still open when the series ends produces no event.
///
/// # Errors
///
/// Returns [`EventError::DimensionMismatch`] if `values` and `timestamps`
/// differ in length, [`EventError::UnknownStation`] if the station has no
/// reflectivity column, and [`EventError::Consistency`] if an event's
/// reflectivity window does not hold `ratio` sub-samples per rainfall
/// sample.
#[tracing::instrument(skip(values, timestamps, reflectivity, config), fields(n_steps = values.len()))]
pub fn segment_station(
    station: &str,
    values: &[f64],
    timestamps: &[NaiveDateTime],
    reflectivity: &StationTable,
    config: &SegmentConfig,
) -> Result<StationEvents, EventError> {
    config.validate()?;
    if values.len() != timestamps.len() {
        return Err(EventError::DimensionMismatch {
            name: station.to_string(),
            expected: timestamps.len(),
            got: values.len(),
        });
    }

    let scan = Scan {
        station,
        values,
        timestamps,
        reflectivity,
        ratio: config.resolution().ratio(),
    };
    let gap = config.max_gap();
    let threshold = config.min_rain_threshold();

    let mut out = StationEvents {
        station: station.to_string(),
        events: Vec::new(),
        reflectivity: Vec::new(),
        rainfall: Vec::new(),
    };

    let mut state = ScanState::Seeking;
    for (j, &value) in values.iter().enumerate() {
        let wet = value >= threshold;
        state = match state {
            ScanState::Seeking if wet => ScanState::Accumulating { start: j, below: 0 },
            ScanState::Seeking => ScanState::Seeking,
            ScanState::Accumulating { start, .. } if wet => {
                ScanState::Accumulating { start, below: 0 }
            }
            ScanState::Accumulating { start, below } => {
                let below = below + 1;
                if below > gap {
                    // The last wet step is j - gap - 1 >= start, so end > start.
                    scan.close(start, j - gap, &mut out)?;
                    ScanState::Seeking
                } else {
                    ScanState::Accumulating { start, below }
                }
            }
        };
    }

    if let ScanState::Accumulating { start, .. } = state {
        trace!(start = %timestamps[start], "dropping candidate still open at series end");
    }

    debug!(
        n_events = out.events.len(),
        n_samples = out.rainfall.len(),
        "station segmented"
    );
    Ok(out)
}
