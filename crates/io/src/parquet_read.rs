//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, SchemaRef, TimeUnit, TimestampMillisecondType};
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;

/// Reads the schema and all record batches from a Parquet file.
///
/// The schema is returned separately so that a file with zero rows still
/// yields its column names.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

/// Locates the time column and checks every other column is numeric.
///
/// Returns the index of the time column.
///
/// # Errors
///
/// Returns [`IoError::Schema`] if the time column is missing or has an
/// unsupported type, or if a station column is not numeric.
pub(crate) fn validate_schema(schema: &SchemaRef, time_column: &str) -> Result<usize, IoError> {
    let (time_idx, time_field) =
        schema
            .column_with_name(time_column)
            .ok_or_else(|| IoError::Schema {
                reason: format!("missing '{time_column}' column"),
            })?;

    if !matches!(
        time_field.data_type(),
        DataType::Timestamp(_, _) | DataType::Int64
    ) {
        return Err(IoError::Schema {
            reason: format!(
                "'{time_column}' must be a timestamp or Int64 milliseconds, got {}",
                time_field.data_type()
            ),
        });
    }

    let mut mismatches = Vec::new();
    for (i, field) in schema.fields().iter().enumerate() {
        if i != time_idx && !field.data_type().is_numeric() {
            mismatches.push(format!("'{}' ({})", field.name(), field.data_type()));
        }
    }
    if !mismatches.is_empty() {
        return Err(IoError::Schema {
            reason: format!("non-numeric station columns: {}", mismatches.join(", ")),
        });
    }

    Ok(time_idx)
}

/// Extracts the time column of one batch, appending to `out`.
///
/// `row_offset` is the index of the batch's first row within the file and
/// only feeds error messages.
pub(crate) fn extend_timestamps(
    column: &dyn Array,
    row_offset: usize,
    out: &mut Vec<NaiveDateTime>,
) -> Result<(), IoError> {
    let millis = cast(column, &DataType::Timestamp(TimeUnit::Millisecond, None))?;
    let millis = millis.as_primitive::<TimestampMillisecondType>();

    out.reserve(millis.len());
    for (i, value) in millis.iter().enumerate() {
        let row = row_offset + i;
        let ms = value.ok_or_else(|| IoError::InvalidTime {
            row,
            reason: "null timestamp".to_string(),
        })?;
        let t = DateTime::from_timestamp_millis(ms).ok_or_else(|| IoError::InvalidTime {
            row,
            reason: format!("{ms} ms is out of range"),
        })?;
        out.push(t.naive_utc());
    }
    Ok(())
}

/// Extracts one station column of one batch as `f64`, appending to `out`.
///
/// Nulls become NaN.
pub(crate) fn extend_values(column: &dyn Array, out: &mut Vec<f64>) -> Result<(), IoError> {
    let values = cast(column, &DataType::Float64)?;
    let values = values.as_primitive::<Float64Type>();
    out.extend(values.iter().map(|v| v.unwrap_or(f64::NAN)));
    Ok(())
}
