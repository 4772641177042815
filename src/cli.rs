use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Rainfall event extraction and Z-R power-law calibration.
#[derive(Parser)]
#[command(
    name = "zrcal",
    version,
    about = "Rainfall event extraction and Z-R power-law calibration"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Extract and merge rainfall events, then export them to Parquet.
    Events(EventsArgs),
    /// Fit Z = a*R^b per calendar year on the cleaned event samples.
    Calibrate(CalibrateArgs),
}

/// Arguments for the `events` subcommand.
#[derive(clap::Args)]
pub struct EventsArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "zrcal.toml")]
    pub config: PathBuf,

    /// Override output Parquet path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the first N single-station events, before merging, in time order.
    #[arg(long, value_name = "N")]
    pub show: Option<usize>,
}

/// Arguments for the `calibrate` subcommand.
#[derive(clap::Args)]
pub struct CalibrateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "zrcal.toml")]
    pub config: PathBuf,

    /// Override report JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only calibrate this calendar year.
    #[arg(long)]
    pub year: Option<i32>,
}
