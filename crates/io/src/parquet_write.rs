//! Low-level Parquet column building for event export.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float64Array, Int64Array, ListBuilder, RecordBatch, StringArray, StringBuilder,
    TimestampMillisecondArray, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use chrono::NaiveDateTime;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use zrcal_events::Event;

use crate::error::IoError;

/// Output column names, in schema order.
pub(crate) const EVENT_COLUMNS: [&str; 13] = [
    "start_time",
    "end_time",
    "duration",
    "stations",
    "num_stations",
    "reflect_min_dbz",
    "reflect_avg_dbz",
    "reflect_max_dbz",
    "rain_intens_min",
    "rain_intens_avg",
    "rain_intens_max",
    "rain_cum_avg",
    "type",
];

/// Converts linear reflectivity (mm⁶/m³) to dBZ.
///
/// Zero maps to 0 dBZ and values below 1 are floored at 0 dBZ. NaN stays
/// NaN.
pub fn to_dbz(z: f64) -> f64 {
    if z.is_nan() {
        f64::NAN
    } else if z == 0.0 {
        0.0
    } else {
        (10.0 * z.log10()).max(0.0)
    }
}

/// Builds the Arrow schema for exported events.
pub(crate) fn build_schema() -> Schema {
    let timestamp = DataType::Timestamp(TimeUnit::Millisecond, None);
    let stations = DataType::List(Arc::new(Field::new("item", DataType::Utf8, true)));

    let mut fields = vec![
        Field::new(EVENT_COLUMNS[0], timestamp.clone(), false),
        Field::new(EVENT_COLUMNS[1], timestamp, false),
        Field::new(EVENT_COLUMNS[2], DataType::Int64, false),
        Field::new(EVENT_COLUMNS[3], stations, false),
        Field::new(EVENT_COLUMNS[4], DataType::UInt32, false),
    ];
    // Summaries may legitimately carry NaN, never null.
    for name in &EVENT_COLUMNS[5..12] {
        fields.push(Field::new(*name, DataType::Float64, false));
    }
    fields.push(Field::new(EVENT_COLUMNS[12], DataType::Utf8, false));

    Schema::new(fields)
}

/// Converts events into one Arrow [`RecordBatch`] matching [`build_schema`].
pub(crate) fn events_to_record_batch(
    events: &[Event],
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let millis = |f: fn(&Event) -> NaiveDateTime| -> Vec<i64> {
        events
            .iter()
            .map(|e| f(e).and_utc().timestamp_millis())
            .collect()
    };
    let floats = |f: fn(&Event) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(events.iter().map(f)))
    };

    let mut stations = ListBuilder::new(StringBuilder::new());
    for event in events {
        for station in event.stations() {
            stations.values().append_value(station);
        }
        stations.append(true);
    }

    let num_stations = events
        .iter()
        .map(|e| u32::try_from(e.num_stations()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| IoError::Parquet {
            reason: format!("station count does not fit in u32: {e}"),
        })?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampMillisecondArray::from(millis(Event::start_time))),
        Arc::new(TimestampMillisecondArray::from(millis(Event::end_time))),
        Arc::new(Int64Array::from_iter_values(
            events.iter().map(Event::duration_hours),
        )),
        Arc::new(stations.finish()),
        Arc::new(UInt32Array::from(num_stations)),
        floats(|e| to_dbz(e.reflectivity().min)),
        floats(|e| to_dbz(e.reflectivity().avg)),
        floats(|e| to_dbz(e.reflectivity().max)),
        floats(|e| e.rain_intensity().min),
        floats(|e| e.rain_intensity().avg),
        floats(|e| e.rain_intensity().max),
        floats(Event::rain_cum_avg),
        Arc::new(StringArray::from_iter_values(
            events.iter().map(|e| e.event_type().as_str()),
        )),
    ];

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: format!("{}: {e}", path.display()),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
