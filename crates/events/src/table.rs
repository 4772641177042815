//! Station-keyed time series tables.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime};

use crate::error::EventError;

/// A set of per-station series sharing one ordered timestamp index.
///
/// Used both for gauge rainfall intensity (one row per rainfall interval)
/// and for radar reflectivity (sub-sampled at a higher rate). Columns keep
/// their insertion order, which determines station discovery order during
/// segmentation.
///
/// Construction fails when timestamps are not strictly increasing, a
/// station name repeats, or a column length differs from the index length.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTable {
    timestamps: Vec<NaiveDateTime>,
    stations: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl StationTable {
    /// Creates a table after validating the index and column shapes.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnorderedTimestamps`],
    /// [`EventError::DuplicateStation`] or [`EventError::DimensionMismatch`].
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, EventError> {
        if let Some(index) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(EventError::UnorderedTimestamps { index: index + 1 });
        }

        let mut seen = HashSet::new();
        let mut stations = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (station, column) in columns {
            if !seen.insert(station.clone()) {
                return Err(EventError::DuplicateStation { station });
            }
            if column.len() != timestamps.len() {
                return Err(EventError::DimensionMismatch {
                    name: station,
                    expected: timestamps.len(),
                    got: column.len(),
                });
            }
            stations.push(station);
            values.push(column);
        }

        Ok(Self {
            timestamps,
            stations,
            columns: values,
        })
    }

    /// Shared timestamp index.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Station names in column order.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// Number of stations.
    pub fn n_stations(&self) -> usize {
        self.stations.len()
    }

    /// Number of rows in the timestamp index.
    pub fn n_timesteps(&self) -> usize {
        self.timestamps.len()
    }

    /// Look up a station column by name.
    pub fn column(&self, station: &str) -> Option<&[f64]> {
        self.stations
            .iter()
            .position(|s| s == station)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterator over `(station, values)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.stations
            .iter()
            .zip(self.columns.iter())
            .map(|(s, c)| (s.as_str(), c.as_slice()))
    }

    /// Values of `station` for timestamps in `[start, end)`.
    ///
    /// The lookup is inclusive of both ends, after which the last row is
    /// dropped, so a window ending exactly on an index entry excludes it.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownStation`] if the station is absent.
    pub fn window(
        &self,
        station: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<&[f64], EventError> {
        let column = self
            .column(station)
            .ok_or_else(|| EventError::UnknownStation {
                station: station.to_string(),
            })?;

        let lo = self.timestamps.partition_point(|t| *t < start);
        let hi = self.timestamps.partition_point(|t| *t <= end);
        if hi <= lo {
            return Ok(&column[0..0]);
        }
        Ok(&column[lo..hi - 1])
    }

    /// Splits the table into one table per calendar year, in time order.
    pub fn split_by_year(&self) -> Vec<(i32, StationTable)> {
        let mut out = Vec::new();
        let mut begin = 0;
        while begin < self.timestamps.len() {
            let year = self.timestamps[begin].year();
            let len = self.timestamps[begin..]
                .iter()
                .take_while(|t| t.year() == year)
                .count();
            let end = begin + len;
            out.push((
                year,
                StationTable {
                    timestamps: self.timestamps[begin..end].to_vec(),
                    stations: self.stations.clone(),
                    columns: self
                        .columns
                        .iter()
                        .map(|c| c[begin..end].to_vec())
                        .collect(),
                },
            ));
            begin = end;
        }
        out
    }
}
