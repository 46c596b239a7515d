//! Command implementations for the lead pipeline CLI
//!
//! Each command is implemented in its own module:
//! - `process`: a full batch run with cleaned output and reports
//! - `sample`: writes a small sample lead sheet

pub mod process;
pub mod sample;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::{Result, bail};

/// Dispatch to the subcommand handler
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Process(process_args)) => process::run_process(process_args).map(|_| ()),
        Some(Commands::Sample(sample_args)) => sample::run_sample(sample_args).map(|_| ()),
        None => bail!("No command given; run with --help to list commands"),
    }
}
