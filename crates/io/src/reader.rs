//! Loading wide station tables from Parquet.

use std::path::Path;

use tracing::{debug, info};
use zrcal_events::StationTable;

use crate::error::IoError;
use crate::parquet_read;

/// Configuration for reading station tables.
///
/// The file layout is one timestamp column plus one numeric column per
/// station; the column name is the station identifier.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Name of the timestamp column.
    time_column: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            time_column: "time".into(),
        }
    }
}

impl ReaderConfig {
    /// Set the name of the timestamp column.
    pub fn with_time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = name.into();
        self
    }

    /// Name of the timestamp column.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }
}

/// Read a station table from a wide Parquet file with the default layout.
///
/// Shorthand for [`read_station_table_with`] and [`ReaderConfig::default`].
pub fn read_station_table(path: &Path) -> Result<StationTable, IoError> {
    read_station_table_with(path, &ReaderConfig::default())
}

/// Read a station table from a wide Parquet file.
///
/// The time column may be any Arrow timestamp unit or Int64 milliseconds
/// since the Unix epoch; timezone-aware timestamps are read in UTC. Station
/// columns are cast to `f64` and nulls become NaN. Station order follows
/// the file's column order.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist,
/// [`IoError::Schema`] if the columns do not match the layout,
/// [`IoError::InvalidTime`] for null or out-of-range timestamps, and
/// [`IoError::Table`] if the timestamps are not strictly increasing or
/// station names repeat.
#[tracing::instrument(skip(config), fields(time_column = config.time_column()))]
pub fn read_station_table_with(path: &Path, config: &ReaderConfig) -> Result<StationTable, IoError> {
    let (schema, batches) = parquet_read::read_batches(path)?;
    let time_idx = parquet_read::validate_schema(&schema, config.time_column())?;

    let station_idx: Vec<usize> = (0..schema.fields().len())
        .filter(|&i| i != time_idx)
        .collect();
    let n_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    debug!(
        batches = batches.len(),
        rows = n_rows,
        stations = station_idx.len(),
        "parquet file opened"
    );

    let mut timestamps = Vec::with_capacity(n_rows);
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(n_rows); station_idx.len()];
    let mut row_offset = 0;
    for batch in &batches {
        parquet_read::extend_timestamps(
            batch.column(time_idx).as_ref(),
            row_offset,
            &mut timestamps,
        )?;
        for (out, &i) in columns.iter_mut().zip(&station_idx) {
            parquet_read::extend_values(batch.column(i).as_ref(), out)?;
        }
        row_offset += batch.num_rows();
    }

    let named = station_idx
        .iter()
        .map(|&i| schema.field(i).name().clone())
        .zip(columns)
        .collect();
    let table = StationTable::new(timestamps, named)?;

    info!(
        stations = table.n_stations(),
        timesteps = table.n_timesteps(),
        "station table loaded"
    );
    Ok(table)
}
