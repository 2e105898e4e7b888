//! # daqfile
//!
//! Command-line front end for 8-channel DAQ measurement files.
//!
//! ## Usage
//!
//! ```bash
//! # Header and channel overview
//! daqfile info run_0042.dat
//!
//! # 2000-point CSV of the DC voltage between 1 s and 3 s
//! daqfile resample run_0042.dat --channel U_DC --start 1 --end 3 -o u_dc.csv
//!
//! # Generate demo data
//! daqfile demo demo_run.dat
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
