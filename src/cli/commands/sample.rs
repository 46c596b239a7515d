//! Sample command: write a small lead sheet to try the pipeline on
//!
//! The sheet has one lead of each kind: two that go through cleanly, one the
//! CRM rejects and one whose welcome email bounces.

use crate::app::adapters::tabular::open_sink;
use crate::app::models::LeadRecord;
use crate::constants::fields;
use anyhow::{Result, bail};
use chrono::Local;
use std::path::{Path, PathBuf};

use crate::cli::args::SampleArgs;

const SAMPLE_LEADS: &[(&str, &str, &str, &str)] = &[
    ("Alice Smith", "alice@example.com", "555-0100", "Website"),
    ("Bob Johnson", "bob@example.com", "555-0101", "Referral"),
    ("Charlie Fail", "charlie_fail@example.com", "555-0102", "Event"),
    ("Diana Bounce", "diana_bounce@example.com", "555-0103", "Ad Campaign"),
];

/// Sample leads dated `created_date`
pub fn sample_leads(created_date: &str) -> Vec<LeadRecord> {
    SAMPLE_LEADS
        .iter()
        .map(|(name, email, phone, source)| {
            LeadRecord::from_pairs([
                (fields::NAME, *name),
                (fields::EMAIL, *email),
                (fields::PHONE, *phone),
                (fields::SOURCE, *source),
                (fields::CREATED_DATE, created_date),
            ])
        })
        .collect()
}

/// Write the sample sheet to `path` (.csv or .parquet)
pub fn write_sample(path: &Path) -> Result<usize> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let leads = sample_leads(&today);
    let columns: Vec<String> = fields::ALL.iter().map(|f| f.to_string()).collect();

    open_sink(path)?.write_rows(&columns, &leads)?;
    Ok(leads.len())
}

/// Run the sample command
pub fn run_sample(args: SampleArgs) -> Result<PathBuf> {
    if args.output_path.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            args.output_path.display()
        );
    }

    let count = write_sample(&args.output_path)?;
    println!(
        "Sample leads written to {} ({} leads)",
        args.output_path.display(),
        count
    );
    Ok(args.output_path)
}
