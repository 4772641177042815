//! Events command: extract, merge and export rainfall events.

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use zrcal_events::Event;
use zrcal_io::write_events;

use crate::cli::EventsArgs;
use crate::config::ZrcalConfig;
use crate::convert;
use crate::pipeline;

/// Run the event extraction pipeline over every year of the input tables.
pub fn run(args: EventsArgs) -> Result<()> {
    let _cmd = info_span!("events").entered();
    let config = ZrcalConfig::load(&args.config)?;

    let output = args
        .output
        .or_else(|| config.io.events.clone())
        .ok_or_else(|| anyhow!("no output path: set [io].events in config or use --output"))?;
    let writer_cfg = convert::build_writer_config(&config.io)?;

    let (rain, radar) = pipeline::load_tables(&config)?;
    let years = pipeline::assemble_years(&config, &rain, &radar, None)?;

    let mut events: Vec<Event> = Vec::new();
    for year in years {
        info!(
            year = year.year,
            n_events = year.dataset.events.len(),
            n_samples = year.dataset.samples.len(),
            "year assembled"
        );
        events.extend(year.dataset.events);
    }

    if let Some(n) = args.show {
        let single = pipeline::single_station_events(&config, &rain, &radar)?;
        print_timeline(&single, n);
    }

    write_events(&output, &events, &writer_cfg)
        .with_context(|| format!("failed to write events: {}", output.display()))?;
    info!(path = %output.display(), n_events = events.len(), "events exported");

    Ok(())
}

/// Prints the first `n` single-station events, already in start-time order.
fn print_timeline(events: &[Event], n: usize) {
    for event in events.iter().take(n) {
        println!("{event}\n");
    }
}
