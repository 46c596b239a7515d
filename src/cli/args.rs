//! Command-line argument definitions for the lead pipeline
//!
//! This module defines the CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::warn;

/// CLI arguments for the daily lead pipeline
///
/// Cleans a lead sheet, pushes each lead through the simulated CRM and
/// welcome-email steps and writes a summary report.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lead-pipeline",
    version,
    about = "Clean a daily lead sheet, deliver leads to a simulated CRM and email service, report the outcome",
    long_about = "Runs one batch of sales leads through the daily pipeline: column labels are \
                  normalised, leads without an email are skipped and duplicates removed, the \
                  cleaned sheet is saved, then every lead is registered in a simulated CRM and \
                  sent a simulated welcome email. A JSON report (and optional HTML dashboard) \
                  summarises the run."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process a lead sheet end to end (main command)
    Process(ProcessArgs),
    /// Write a small sample lead sheet to try the pipeline on
    Sample(SampleArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Raw lead sheet to read (.csv or .parquet)
    ///
    /// Defaults to ./leads.csv unless set in the config file.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Raw lead sheet to read (.csv or .parquet)"
    )]
    pub input_path: Option<PathBuf>,

    /// Where to write the cleaned lead sheet (.csv or .parquet)
    #[arg(
        short = 'o',
        long = "cleaned-output",
        value_name = "FILE",
        help = "Where to write the cleaned lead sheet"
    )]
    pub cleaned_output_path: Option<PathBuf>,

    /// JSON report location; the HTML dashboard is written next to it
    #[arg(
        short = 'r',
        long = "report",
        value_name = "FILE",
        help = "Where to write the JSON summary report"
    )]
    pub report_path: Option<PathBuf>,

    #[arg(long = "no-html", help = "Do not write the HTML dashboard")]
    pub no_html: bool,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/lead-pipeline/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Probability that the CRM rejects a lead at random (clamped to 0..=1)
    #[arg(long = "failure-rate", value_name = "RATE")]
    pub failure_rate: Option<f64>,

    /// Lower bound of simulated CRM latency in seconds
    #[arg(long = "min-latency", value_name = "SECS")]
    pub min_latency: Option<f64>,

    /// Upper bound of simulated CRM latency in seconds
    #[arg(long = "max-latency", value_name = "SECS")]
    pub max_latency: Option<f64>,

    /// Seed for reproducible simulated failures
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the final summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the sample command
#[derive(Debug, Clone, Parser)]
pub struct SampleArgs {
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = "leads.csv",
        help = "Where to write the sample lead sheet (.csv or .parquet)"
    )]
    pub output_path: PathBuf,

    #[arg(long = "force", help = "Overwrite the file if it already exists")]
    pub force: bool,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl ProcessArgs {
    /// Check arguments that clap cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.min_latency, self.max_latency) {
            if min > max {
                warn!(
                    "Maximum latency ({}) is below minimum latency ({}); it will be raised to the minimum",
                    max, min
                );
            }
        }

        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars only make sense for an interactive human-format run
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}
