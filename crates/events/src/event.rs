//! The rainfall event entity.

use std::fmt;

use chrono::NaiveDateTime;
use zrcal_stats::Summary;

use crate::error::EventError;

/// Upper bound (inclusive) of mean intensity for a light event, in mm/h.
pub const LIGHT_MAX: f64 = 5.0;
/// Upper bound (inclusive) of mean intensity for a moderate event, in mm/h.
pub const MODERATE_MAX: f64 = 25.0;
/// Upper bound (inclusive) of mean intensity for a heavy event, in mm/h.
pub const HEAVY_MAX: f64 = 50.0;

/// Severity class of a rainfall event, derived from its mean intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Mean intensity at or below [`LIGHT_MAX`].
    Light,
    /// Mean intensity above [`LIGHT_MAX`], at or below [`MODERATE_MAX`].
    Moderate,
    /// Mean intensity above [`MODERATE_MAX`], at or below [`HEAVY_MAX`].
    Heavy,
    /// Mean intensity above [`HEAVY_MAX`].
    Extreme,
}

impl EventType {
    /// Classifies a mean rainfall intensity in mm/h.
    pub fn classify(rain_intens_avg: f64) -> Self {
        if rain_intens_avg <= LIGHT_MAX {
            Self::Light
        } else if rain_intens_avg <= MODERATE_MAX {
            Self::Moderate
        } else if rain_intens_avg <= HEAVY_MAX {
            Self::Heavy
        } else {
            Self::Extreme
        }
    }

    /// Lower-case label used in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
            Self::Extreme => "extreme",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rainfall episode, observed at one or more stations.
///
/// Duration, cumulative rainfall and type are derived once at construction;
/// an `Event` is never modified afterwards. Merging two events builds a new
/// one (see [`crate::merge_pair`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    duration_hours: i64,
    stations: Vec<String>,
    reflectivity: Summary,
    rain_intensity: Summary,
    rain_cum_avg: f64,
    event_type: EventType,
}

impl Event {
    /// Creates an event and derives its duration, cumulative rain and type.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidWindow`] if `end_time <= start_time`.
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        stations: Vec<String>,
        reflectivity: Summary,
        rain_intensity: Summary,
    ) -> Result<Self, EventError> {
        if end_time <= start_time {
            return Err(EventError::InvalidWindow {
                start: start_time,
                end: end_time,
            });
        }

        let duration_hours = (end_time - start_time).num_seconds().div_euclid(3600);
        Ok(Self {
            start_time,
            end_time,
            duration_hours,
            stations,
            reflectivity,
            rain_intensity,
            rain_cum_avg: rain_intensity.avg * duration_hours as f64,
            event_type: EventType::classify(rain_intensity.avg),
        })
    }

    /// First timestamp of the event.
    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// End of the event, excluding the trailing dry window.
    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    /// Whole hours between start and end, rounded down.
    pub fn duration_hours(&self) -> i64 {
        self.duration_hours
    }

    /// Stations contributing to the event, in discovery order.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// Number of stations that observed the event.
    pub fn num_stations(&self) -> usize {
        self.stations.len()
    }

    /// Reflectivity statistics in linear Z units.
    pub fn reflectivity(&self) -> &Summary {
        &self.reflectivity
    }

    /// Rain intensity statistics in mm/h.
    pub fn rain_intensity(&self) -> &Summary {
        &self.rain_intensity
    }

    /// Mean intensity times duration, in mm.
    pub fn rain_cum_avg(&self) -> f64 {
        self.rain_cum_avg
    }

    /// Severity class derived from the mean rain intensity.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start time: {}", self.start_time)?;
        writeln!(f, "End time: {}", self.end_time)?;
        writeln!(f, "Duration: {}", self.duration_hours)?;
        writeln!(f, "Stations: {:?}", self.stations)?;
        writeln!(f, "Num stations: {}", self.num_stations())?;
        writeln!(
            f,
            "Reflectivity (min, avg, max) in Z: ({}, {}, {})",
            self.reflectivity.min, self.reflectivity.avg, self.reflectivity.max
        )?;
        writeln!(
            f,
            "Rain intensity (min, avg, max) in mm/h: ({}, {}, {})",
            self.rain_intensity.min, self.rain_intensity.avg, self.rain_intensity.max
        )?;
        writeln!(f, "Rain cumulative avg: {}", self.rain_cum_avg)?;
        write!(f, "Type: {}", self.event_type)
    }
}
