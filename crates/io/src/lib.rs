//! # zrcal-io
//!
//! Load wide station tables (gauge intensity, radar reflectivity) from
//! Parquet and export merged rainfall events back to Parquet. Bridges the
//! file format into the `StationTable` and `Event` types of
//! `zrcal-events`.

mod error;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
pub use parquet_write::to_dbz;
pub use reader::{ReaderConfig, read_station_table, read_station_table_with};
pub use writer::{Compression, WriterConfig, write_events};
