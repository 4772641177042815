//! Integration tests: multi-station assembly from rain and radar tables.

use approx::assert_abs_diff_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zrcal_events::{
    EventError, EventType, SegmentConfig, StationTable, TemporalResolution, assemble,
    segment_stations,
};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hourly(n: usize) -> Vec<NaiveDateTime> {
    (0..n).map(|i| t0() + Duration::hours(i as i64)).collect()
}

fn six_minute(hours: usize) -> Vec<NaiveDateTime> {
    (0..hours * 10)
        .map(|k| t0() + Duration::minutes(6 * k as i64))
        .collect()
}

fn padded(prefix: &[f64], n: usize) -> Vec<f64> {
    let mut v = prefix.to_vec();
    v.resize(n, 0.0);
    v
}

/// Two stations whose events overlap by one hour.
fn overlapping_fixture() -> (StationTable, StationTable) {
    let n = 24;
    let rain = StationTable::new(
        hourly(n),
        vec![
            ("s1".into(), padded(&[0.0, 2.0, 3.0], n)),
            ("s2".into(), padded(&[0.0, 0.0, 4.0, 5.0], n)),
        ],
    )
    .unwrap();

    let mut s2_radar = vec![400.0; n * 10];
    s2_radar[30] = 0.0;
    let radar = StationTable::new(
        six_minute(n),
        vec![("s1".into(), vec![200.0; n * 10]), ("s2".into(), s2_radar)],
    )
    .unwrap();
    (rain, radar)
}

#[test]
fn overlapping_stations_merge_into_one_event() {
    let (rain, radar) = overlapping_fixture();
    let dataset = assemble(&rain, &radar, &SegmentConfig::new(2)).unwrap();

    assert_eq!(dataset.events.len(), 1);
    let e = &dataset.events[0];
    assert_eq!(e.start_time(), t0() + Duration::hours(1));
    assert_eq!(e.end_time(), t0() + Duration::hours(4));
    assert_eq!(e.duration_hours(), 3);
    assert_eq!(e.stations(), &["s1".to_string(), "s2".to_string()]);
    assert_eq!(e.num_stations(), 2);
    assert_abs_diff_eq!(e.rain_intensity().avg, 3.5, epsilon = 1e-12);
    assert_eq!(e.rain_intensity().min, 2.0);
    assert_eq!(e.rain_intensity().max, 5.0);
    assert_abs_diff_eq!(e.reflectivity().avg, 290.0, epsilon = 1e-9);
    assert_eq!(e.reflectivity().min, 0.0);
    assert_eq!(e.reflectivity().max, 400.0);
    assert_eq!(e.event_type(), EventType::Light);
}

#[test]
fn samples_are_reshaped_and_cleaned() {
    let (rain, radar) = overlapping_fixture();
    let dataset = assemble(&rain, &radar, &SegmentConfig::new(2)).unwrap();

    let samples = &dataset.samples;
    assert_eq!(samples.ratio(), 10);
    // The s2 hour holding a zero sub-sample is dropped.
    assert_eq!(samples.r(), &[2.0, 3.0, 4.0]);
    assert_eq!(samples.z().len(), 30);
    assert_eq!(samples.row_means(), vec![200.0, 200.0, 400.0]);
}

#[test]
fn pre_merge_results_keep_station_order() {
    let (rain, radar) = overlapping_fixture();
    let per_station = segment_stations(&rain, &radar, &SegmentConfig::new(2)).unwrap();
    assert_eq!(per_station.len(), 2);
    assert_eq!(per_station[0].station, "s1");
    assert_eq!(per_station[1].station, "s2");
    assert_eq!(per_station[0].rainfall, vec![2.0, 3.0]);
    assert_eq!(per_station[1].rainfall, vec![4.0, 5.0]);
}

#[test]
fn single_event_is_returned_unmerged() {
    let n = 12;
    let rain = StationTable::new(
        hourly(n),
        vec![
            ("s1".into(), padded(&[0.0, 7.0], n)),
            ("s2".into(), vec![0.0; n]),
        ],
    )
    .unwrap();
    let radar = StationTable::new(
        six_minute(n),
        vec![
            ("s1".into(), vec![300.0; n * 10]),
            ("s2".into(), vec![300.0; n * 10]),
        ],
    )
    .unwrap();

    let dataset = assemble(&rain, &radar, &SegmentConfig::new(1)).unwrap();
    assert_eq!(dataset.events.len(), 1);
    assert_eq!(dataset.events[0].stations(), &["s1".to_string()]);
    assert_eq!(dataset.samples.r(), &[7.0]);
}

#[test]
fn dry_period_yields_empty_dataset() {
    let n = 12;
    let rain = StationTable::new(hourly(n), vec![("s1".into(), vec![0.0; n])]).unwrap();
    let radar = StationTable::new(six_minute(n), vec![("s1".into(), vec![1.0; n * 10])]).unwrap();

    let dataset = assemble(&rain, &radar, &SegmentConfig::new(1)).unwrap();
    assert!(dataset.events.is_empty());
    assert!(dataset.samples.is_empty());
}

#[test]
fn event_without_reflectivity_is_dropped() {
    let n = 12;
    let rain = StationTable::new(
        hourly(n),
        vec![
            ("s1".into(), padded(&[1.0], n)),
            ("s2".into(), padded(&[0.0, 0.0, 0.0, 0.0, 0.0, 2.0], n)),
        ],
    )
    .unwrap();
    let radar = StationTable::new(
        six_minute(n),
        vec![
            ("s1".into(), vec![150.0; n * 10]),
            ("s2".into(), vec![f64::NAN; n * 10]),
        ],
    )
    .unwrap();

    let dataset = assemble(&rain, &radar, &SegmentConfig::new(1)).unwrap();
    assert_eq!(dataset.events.len(), 1);
    assert_eq!(dataset.events[0].stations(), &["s1".to_string()]);
    assert_eq!(dataset.samples.r(), &[1.0]);
}

#[test]
fn hourly_radar_with_six_minute_mode_fails() {
    let n = 6;
    let rain = StationTable::new(hourly(n), vec![("s1".into(), padded(&[1.0], n))]).unwrap();
    let radar = StationTable::new(hourly(n), vec![("s1".into(), vec![1.0; n])]).unwrap();

    let err = assemble(&rain, &radar, &SegmentConfig::new(1)).unwrap_err();
    assert!(matches!(err, EventError::Consistency { .. }));

    let hourly_cfg = SegmentConfig::new(1).with_resolution(TemporalResolution::Hourly);
    let dataset = assemble(&rain, &radar, &hourly_cfg).unwrap();
    assert_eq!(dataset.samples.ratio(), 1);
    assert_eq!(dataset.samples.len(), 1);
}

/// Random gauges and radar with zeros and gaps.
fn random_fixture(seed: u64, n_stations: usize, n: usize) -> (StationTable, StationTable) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rain_cols = Vec::new();
    let mut radar_cols = Vec::new();
    for s in 0..n_stations {
        let rain: Vec<f64> = (0..n)
            .map(|_| {
                if rng.random_bool(0.35) {
                    rng.random_range(0.0..30.0)
                } else {
                    0.0
                }
            })
            .collect();
        let radar: Vec<f64> = (0..n * 10)
            .map(|_| {
                let u: f64 = rng.random();
                if u < 0.02 {
                    f64::NAN
                } else if u < 0.04 {
                    0.0
                } else {
                    rng.random_range(1.0..5000.0)
                }
            })
            .collect();
        rain_cols.push((format!("station_{s}"), rain));
        radar_cols.push((format!("station_{s}"), radar));
    }
    (
        StationTable::new(hourly(n), rain_cols).unwrap(),
        StationTable::new(six_minute(n), radar_cols).unwrap(),
    )
}

#[test]
fn random_inputs_satisfy_invariants() {
    for seed in [1, 7, 42] {
        let (rain, radar) = random_fixture(seed, 4, 400);
        let dataset = assemble(&rain, &radar, &SegmentConfig::new(2)).unwrap();

        assert!(!dataset.events.is_empty());
        for e in &dataset.events {
            assert!(e.end_time() > e.start_time());
            assert!(e.duration_hours() >= 0);
            let refl = e.reflectivity();
            let rain = e.rain_intensity();
            let tol = 1e-9;
            assert!(refl.min <= refl.avg + tol && refl.avg <= refl.max + tol);
            assert!(rain.min <= rain.avg + tol && rain.avg <= rain.max + tol);
            assert_eq!(e.event_type(), EventType::classify(rain.avg));
            assert_eq!(e.num_stations(), e.stations().len());
        }
        for w in dataset.events.windows(2) {
            assert!(w[0].end_time() < w[1].start_time());
        }

        let samples = &dataset.samples;
        assert_eq!(samples.z().len(), samples.ratio() * samples.len());
        assert!(samples.z().iter().all(|z| *z != 0.0 && !z.is_nan()));
        assert!(samples.r().iter().all(|r| *r != 0.0 && !r.is_nan()));
    }
}

#[test]
fn assembly_is_deterministic() {
    let (rain, radar) = random_fixture(3, 5, 300);
    let config = SegmentConfig::new(1).with_min_rain_threshold(0.5);
    let a = assemble(&rain, &radar, &config).unwrap();
    let b = assemble(&rain, &radar, &config).unwrap();
    assert_eq!(a.events, b.events);
    assert_eq!(a.samples.r(), b.samples.r());
    assert_eq!(a.samples.z().len(), b.samples.z().len());
}
