//! Shared driver: load both station tables and assemble one dataset per
//! calendar year.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use zrcal_events::{Dataset, Event, StationTable, assemble, segment_stations};
use zrcal_io::read_station_table_with;

use crate::config::ZrcalConfig;
use crate::convert;

/// Events and cleaned samples of one calendar year.
pub struct YearDataset {
    pub year: i32,
    pub dataset: Dataset,
}

/// Loads the rain and radar tables named in `config`.
pub fn load_tables(config: &ZrcalConfig) -> Result<(StationTable, StationTable)> {
    let reader_cfg = convert::build_reader_config(&config.io);

    info!(path = %config.io.rain.display(), "reading rain gauge table");
    let rain = read_station_table_with(&config.io.rain, &reader_cfg)
        .with_context(|| format!("failed to read rain table: {}", config.io.rain.display()))?;

    info!(path = %config.io.radar.display(), "reading radar table");
    let radar = read_station_table_with(&config.io.radar, &reader_cfg)
        .with_context(|| format!("failed to read radar table: {}", config.io.radar.display()))?;

    Ok((rain, radar))
}

/// Pairs each calendar year of the rain table with the same year of the
/// radar table.
///
/// Years without radar coverage are skipped with a warning. When `only` is
/// set, every other year is skipped.
fn year_pairs(
    rain: &StationTable,
    radar: &StationTable,
    only: Option<i32>,
) -> Vec<(i32, StationTable, StationTable)> {
    let mut radar_years: BTreeMap<i32, StationTable> = radar.split_by_year().into_iter().collect();

    let mut out = Vec::new();
    for (year, rain_year) in rain.split_by_year() {
        if only.is_some_and(|y| y != year) {
            continue;
        }
        match radar_years.remove(&year) {
            Some(radar_year) => out.push((year, rain_year, radar_year)),
            None => warn!(year, "no radar data for this year, skipping"),
        }
    }
    out
}

/// Assembles one dataset per calendar year of the rain table.
///
/// Years are selected as in [`year_pairs`].
pub fn assemble_years(
    config: &ZrcalConfig,
    rain: &StationTable,
    radar: &StationTable,
    only: Option<i32>,
) -> Result<Vec<YearDataset>> {
    let segment_cfg = convert::build_segment_config(&config.events)?;

    let mut out = Vec::new();
    for (year, rain_year, radar_year) in year_pairs(rain, radar, only) {
        let _span = info_span!("year", year).entered();
        let dataset = assemble(&rain_year, &radar_year, &segment_cfg)
            .with_context(|| format!("failed to assemble events for {year}"))?;
        out.push(YearDataset { year, dataset });
    }

    if out.is_empty() {
        warn!("no year produced a dataset");
    }
    Ok(out)
}

/// Collects the single-station events of every year before merging,
/// sorted by start time.
///
/// Events without a reflectivity summary are left out, matching what
/// [`assemble`] hands to the merger.
pub fn single_station_events(
    config: &ZrcalConfig,
    rain: &StationTable,
    radar: &StationTable,
) -> Result<Vec<Event>> {
    let segment_cfg = convert::build_segment_config(&config.events)?;

    let mut events = Vec::new();
    for (year, rain_year, radar_year) in year_pairs(rain, radar, None) {
        let per_station = segment_stations(&rain_year, &radar_year, &segment_cfg)
            .with_context(|| format!("failed to segment stations for {year}"))?;
        events.extend(
            per_station
                .into_iter()
                .flat_map(|s| s.events)
                .filter(|e| !e.reflectivity().is_nan()),
        );
    }
    events.sort_by_key(|e| e.start_time());
    Ok(events)
}
