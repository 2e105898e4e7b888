use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use daqfile::channel::Channel;
use daqfile::derive::{derive_with, DeriveConfig, DerivedSet};
use daqfile::format::{decode_file, DecodedFile};

mod config;
mod demo;
mod info;
mod resample;
mod stats;
mod validate;

pub use config::Config;

/// daqfile - Inspect and resample 8-channel DAQ measurement files
#[derive(Parser)]
#[command(name = "daqfile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display header and channel overview of a measurement file
    Info {
        /// Input measurement file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Print min/max/mean/stddev/rms for channels
    Stats {
        /// Input measurement file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Channel id or label (CH0-CH7, D0-D6); all channels when omitted
        #[arg(short, long)]
        channel: Option<String>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Reduce a time window of one channel and write it as CSV
    Resample {
        /// Input measurement file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Channel id or label (CH0-CH7, D0-D6)
        #[arg(short, long)]
        channel: String,

        /// Window start in seconds
        #[arg(short, long, default_value_t = 0.0)]
        start: f32,

        /// Window end in seconds (defaults to the end of the channel)
        #[arg(short, long)]
        end: Option<f32>,

        /// Target number of points (default from config, else 2000)
        #[arg(short = 'n', long)]
        max_points: Option<u32>,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long, value_name = "CSV")]
        output: Option<PathBuf>,
    },

    /// Validate decoding invariants of a measurement file
    Validate {
        /// Input measurement file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate a synthetic measurement file for testing
    Demo {
        /// Output file path
        #[arg(value_name = "OUTPUT", default_value = "demo_run.dat")]
        output: PathBuf,

        /// Number of sample rows
        #[arg(short, long, default_value_t = 100_000)]
        rows: u32,

        /// Base sampling interval in nanoseconds
        #[arg(short, long, default_value_t = 100_000)]
        interval_ns: u32,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Info { file, json } => info::run(&file, json || config.output.json.unwrap_or(false), &config),
        Commands::Stats { file, channel, json } => stats::run(
            &file,
            channel.as_deref(),
            json || config.output.json.unwrap_or(false),
            &config,
        ),
        Commands::Resample {
            file,
            channel,
            start,
            end,
            max_points,
            output,
        } => resample::run(&file, &channel, start, end, max_points, output.as_deref(), &config),
        Commands::Validate { file } => validate::run(file),
        Commands::Demo {
            output,
            rows,
            interval_ns,
        } => demo::run(output, rows, interval_ns),
    }
}

/// Decoded file plus its derived channels
pub(crate) struct Loaded {
    pub file: DecodedFile,
    pub derived: DerivedSet,
}

impl Loaded {
    /// Resolve a raw or derived channel by id or label
    pub fn lookup(&self, name: &str) -> Option<&Channel> {
        self.file.find(name).or_else(|| self.derived.find(name))
    }

    /// Raw channels followed by derived channels
    pub fn all_channels(&self) -> impl Iterator<Item = &Channel> {
        self.file.channels().iter().chain(self.derived.channels().values())
    }
}

pub(crate) fn load(path: &Path, config: &Config) -> Result<Loaded> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    let file = decode_file(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    info!(
        "Decoded {} rows x {} channels from {}",
        file.header().buffer_size,
        file.channels().len(),
        path.display()
    );

    let derive_config = DeriveConfig {
        parallel: config.derive.parallel.unwrap_or(false),
    };
    let derived = derive_with(file.channels(), &derive_config);
    info!(
        "Derived {} channels ({} skipped)",
        derived.len(),
        derived.warnings().len()
    );

    Ok(Loaded { file, derived })
}
