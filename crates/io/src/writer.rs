//! High-level Parquet writer configuration and event export.

use std::path::Path;
use std::str::FromStr;

use parquet::file::properties::WriterProperties;
use tracing::info;
use zrcal_events::Event;

use crate::error::IoError;
use crate::parquet_write;

/// Compression codec for the event file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Plain pages.
    None,
    /// Snappy.
    #[default]
    Snappy,
    /// Zstd at level 3.
    Zstd,
}

impl FromStr for Compression {
    type Err = IoError;

    /// Parses "none", "snappy" or "zstd", ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            other => Err(IoError::InvalidConfig {
                reason: format!("unknown compression: {other:?}"),
            }),
        }
    }
}

impl Compression {
    fn codec(self) -> Result<parquet::basic::Compression, IoError> {
        use parquet::basic::{Compression as Codec, ZstdLevel};

        match self {
            Self::None => Ok(Codec::UNCOMPRESSED),
            Self::Snappy => Ok(Codec::SNAPPY),
            Self::Zstd => Ok(Codec::ZSTD(ZstdLevel::try_new(3)?)),
        }
    }
}

/// Configuration for writing events to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 100_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Maximum number of rows per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Builds the Parquet writer properties.
    ///
    /// Fails with [`IoError::InvalidConfig`] if `row_group_size` is zero.
    fn properties(&self) -> Result<WriterProperties, IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::InvalidConfig {
                reason: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(WriterProperties::builder()
            .set_compression(self.compression.codec()?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

/// Write events to a Parquet file, one row per event.
///
/// Columns are `start_time`, `end_time`, `duration` (whole hours),
/// `stations` (list of identifiers), `num_stations`, the reflectivity
/// summary in dBZ (see [`to_dbz`](crate::to_dbz)), the rain-intensity
/// summary in mm/h, `rain_cum_avg` and the intensity class as `type`.
/// An empty slice produces a file with the schema and no rows.
///
/// # Errors
///
/// Returns [`IoError::InvalidConfig`] if the configuration is invalid, or
/// [`IoError::Parquet`] if batch conversion or file I/O fails.
#[tracing::instrument(skip(events, config), fields(n_events = events.len()))]
pub fn write_events(path: &Path, events: &[Event], config: &WriterConfig) -> Result<(), IoError> {
    let props = config.properties()?;
    let schema = parquet_write::build_schema();
    let batch = parquet_write::events_to_record_batch(events, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;

    info!(rows = events.len(), "events written");
    Ok(())
}
