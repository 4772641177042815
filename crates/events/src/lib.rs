//! # zrcal-events
//!
//! Extracts rainfall events from per-station gauge intensity series and
//! co-located radar reflectivity, merges them across stations, and prepares
//! the paired reflectivity/rainfall samples used to calibrate a Z-R power
//! law.
//!
//! ## Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//!  │ StationTable │────▶│   segment    │────▶│    merge     │────▶│   dataset    │
//!  │ (rain, radar)│     │ (per station)│     │ (overlaps)   │     │ (reshape,    │
//!  └──────────────┘     └──────────────┘     └──────────────┘     │  clean)      │
//!                                                                 └──────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use zrcal_events::{SegmentConfig, assemble};
//!
//! let config = SegmentConfig::new(3).with_min_rain_threshold(0.1);
//! let dataset = assemble(&rain, &radar, &config)?;
//! for event in &dataset.events {
//!     println!("{event}");
//! }
//! ```

mod config;
mod dataset;
mod error;
mod event;
mod merge;
mod segment;
mod table;

pub use config::{SegmentConfig, TemporalResolution};
pub use dataset::{Dataset, SampleFilter, SampleSet, assemble, clean_samples, segment_stations};
pub use error::EventError;
pub use event::{Event, EventType, HEAVY_MAX, LIGHT_MAX, MODERATE_MAX};
pub use merge::{merge_overlapping, merge_pair};
pub use segment::{StationEvents, segment_station};
pub use table::StationTable;
pub use zrcal_stats::Summary;
