//! Integration tests: load wide station tables from Parquet.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, RecordBatch, TimestampNanosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use zrcal_events::EventError;
use zrcal_io::{IoError, ReaderConfig, read_station_table, read_station_table_with};

const HOUR_NS: i64 = 3_600_000_000_000;

/// Writes `batches` (sharing one schema) to `path`.
fn write_file(path: &Path, batches: &[RecordBatch]) {
    let file = std::fs::File::create(path).expect("create file");
    let mut writer = ArrowWriter::try_new(file, batches[0].schema(), None).expect("writer");
    for batch in batches {
        writer.write(batch).expect("write batch");
    }
    writer.close().expect("close");
}

fn wide_batch(times_ns: Vec<i64>, s1: Vec<Option<f64>>, s2: Vec<Option<f64>>) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new(
            "time",
            DataType::Timestamp(TimeUnit::Nanosecond, None),
            false,
        ),
        Field::new("zurich", DataType::Float64, true),
        Field::new("bern", DataType::Float64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampNanosecondArray::from(times_ns)),
        Arc::new(Float64Array::from(s1)),
        Arc::new(Float64Array::from(s2)),
    ];
    RecordBatch::try_new(schema, columns).expect("batch")
}

#[test]
fn reads_nanosecond_timestamps_and_nulls() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("rain.parquet");

    let batch = wide_batch(
        vec![0, HOUR_NS, 2 * HOUR_NS],
        vec![Some(0.0), Some(1.2), None],
        vec![Some(3.0), None, Some(0.5)],
    );
    write_file(&path, &[batch]);

    let table = read_station_table(&path).expect("read succeeds");
    assert_eq!(table.stations(), ["zurich", "bern"]);
    assert_eq!(table.n_timesteps(), 3);

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(table.timestamps()[0], epoch);
    assert_eq!((table.timestamps()[2] - epoch).num_hours(), 2);

    let zurich = table.column("zurich").unwrap();
    assert_eq!(&zurich[..2], &[0.0, 1.2]);
    assert!(zurich[2].is_nan());

    let bern = table.column("bern").unwrap();
    assert!(bern[1].is_nan());
    assert_eq!(bern[2], 0.5);
}

#[test]
fn concatenates_multiple_batches() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("radar.parquet");

    let first = wide_batch(vec![0, HOUR_NS], vec![Some(1.0); 2], vec![Some(2.0); 2]);
    let second = wide_batch(
        vec![2 * HOUR_NS, 3 * HOUR_NS],
        vec![Some(3.0); 2],
        vec![Some(4.0); 2],
    );
    write_file(&path, &[first, second]);

    let table = read_station_table(&path).expect("read succeeds");
    assert_eq!(table.n_timesteps(), 4);
    assert_eq!(table.column("zurich").unwrap(), &[1.0, 1.0, 3.0, 3.0]);
    assert_eq!(table.column("bern").unwrap(), &[2.0, 2.0, 4.0, 4.0]);
}

#[test]
fn int64_millis_under_custom_name() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("rain_ms.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("station_a", DataType::Float64, true),
        Field::new("datetime", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Float64Array::from(vec![0.3, 0.0])) as ArrayRef,
            Arc::new(Int64Array::from(vec![0, 360_000])),
        ],
    )
    .expect("batch");
    write_file(&path, &[batch]);

    let config = ReaderConfig::default().with_time_column("datetime");
    let table = read_station_table_with(&path, &config).expect("read succeeds");
    assert_eq!(table.stations(), ["station_a"]);
    assert_eq!(
        (table.timestamps()[1] - table.timestamps()[0]).num_minutes(),
        6
    );

    // Default layout expects a `time` column.
    let err = read_station_table(&path).unwrap_err();
    assert!(matches!(err, IoError::Schema { .. }));
}

#[test]
fn unordered_timestamps_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("unordered.parquet");

    let batch = wide_batch(
        vec![HOUR_NS, 0],
        vec![Some(0.0); 2],
        vec![Some(0.0); 2],
    );
    write_file(&path, &[batch]);

    let err = read_station_table(&path).unwrap_err();
    assert!(matches!(
        err,
        IoError::Table(EventError::UnorderedTimestamps { index: 1 })
    ));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = read_station_table(&dir.path().join("absent.parquet")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}
