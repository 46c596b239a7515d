//! Cleanup and deduplication stage for raw lead batches
//!
//! This module turns a raw lead sheet into the set of leads worth delivering.
//!
//! # Processing Pipeline
//!
//! 1. **Normalisation**: map column aliases to canonical fields, trim text cells
//! 2. **Schema check**: the batch must carry an Email column at all
//! 3. **Missing email filter**: drop rows whose trimmed Email is absent or blank
//! 4. **Deduplication**: keep the first row per exact Email, drop later ones
//!
//! Surviving rows keep their original relative order. The counters satisfy
//! `total_raw_leads == leads.len() + leads_skipped_missing_email + duplicates_removed`.
//!
//! # Example Usage
//!
//! ```rust
//! use lead_pipeline::app::models::{LeadRecord, RawBatch};
//! use lead_pipeline::app::services::cleanup::clean_leads;
//!
//! # fn example() -> lead_pipeline::Result<()> {
//! let batch = RawBatch::from_rows(vec![
//!     LeadRecord::from_pairs([("e-mail", "x@a.com")]),
//!     LeadRecord::from_pairs([("e-mail", "x@a.com")]),
//!     LeadRecord::from_pairs([("e-mail", "")]),
//! ]);
//!
//! let result = clean_leads(batch)?;
//! assert_eq!(result.lead_count(), 1);
//! assert_eq!(result.stats.duplicates_removed, 1);
//! assert_eq!(result.stats.leads_skipped_missing_email, 1);
//! # Ok(())
//! # }
//! ```

pub mod deduplication;
pub mod stats;

#[cfg(test)]
pub mod tests;

use crate::app::models::RawBatch;
use crate::app::services::normalizer::normalize_batch;
use crate::constants::fields;
use crate::{Error, Result};
use tracing::info;

pub use deduplication::{
    analyze_duplicate_patterns, are_duplicates, deduplicate_by_email, filter_missing_email,
};
pub use stats::{CleanupResult, CleanupStats};

/// Require the Email column in a normalised schema
///
/// A batch with neither columns nor rows is an empty batch, not a broken one.
pub fn check_schema(batch: &RawBatch) -> Result<()> {
    if batch.columns.is_empty() && batch.rows.is_empty() {
        return Ok(());
    }
    if !batch.has_column(fields::EMAIL) {
        return Err(Error::schema(format!(
            "Expected '{}' column in input leads file (found: {})",
            fields::EMAIL,
            if batch.columns.is_empty() {
                "no columns".to_string()
            } else {
                batch.columns.join(", ")
            }
        )));
    }
    Ok(())
}

/// Run the full cleanup stage over a raw batch
///
/// Fails only for structural problems (no Email column); per-row problems are
/// counted in the returned statistics.
pub fn clean_leads(batch: RawBatch) -> Result<CleanupResult> {
    let batch = normalize_batch(batch);
    check_schema(&batch)?;

    let mut stats = CleanupStats::new();
    stats.total_raw_leads = batch.rows.len();

    let RawBatch { columns, rows } = batch;
    let with_email = filter_missing_email(rows, &mut stats);
    let leads = deduplicate_by_email(with_email, &mut stats);

    info!("Cleanup complete: {}", stats.summary());

    Ok(CleanupResult::new(columns, leads, stats))
}
