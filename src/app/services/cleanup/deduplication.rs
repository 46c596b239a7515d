//! Missing-email filtering and email-based deduplication
//!
//! Identity is the trimmed Email exactly as provided. No case folding is
//! applied, so `Ann@x.com` and `ann@x.com` are two leads.

use crate::app::models::LeadRecord;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::stats::CleanupStats;

/// Drop rows whose Email is absent, null or blank
///
/// Every dropped row increments `leads_skipped_missing_email`.
pub fn filter_missing_email(rows: Vec<LeadRecord>, stats: &mut CleanupStats) -> Vec<LeadRecord> {
    let before = rows.len();
    let kept: Vec<LeadRecord> = rows
        .into_iter()
        .filter(|row| row.email().is_some())
        .collect();

    let skipped = before - kept.len();
    stats.leads_skipped_missing_email += skipped;
    if skipped > 0 {
        debug!("Skipped {} leads without an email address", skipped);
    }

    kept
}

/// Keep the first row for each Email, in original order
///
/// Every later occurrence increments `duplicates_removed`. Rows without an
/// email are expected to have been filtered already and are kept as-is.
pub fn deduplicate_by_email(rows: Vec<LeadRecord>, stats: &mut CleanupStats) -> Vec<LeadRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut deduplicated = Vec::with_capacity(rows.len());
    let mut duplicates_removed = 0;

    for row in rows {
        match row.email() {
            Some(email) if !seen.insert(email.clone()) => {
                debug!("Dropping duplicate lead for {}", email);
                duplicates_removed += 1;
            }
            _ => deduplicated.push(row),
        }
    }

    stats.duplicates_removed += duplicates_removed;
    info!(
        "Deduplication complete: removed {} duplicates, {} leads remaining",
        duplicates_removed,
        deduplicated.len()
    );

    deduplicated
}

/// Analyze duplicate patterns in a set of leads
///
/// # Returns
///
/// Tuple of (distinct emails, emails seen more than once, total duplicate rows)
pub fn analyze_duplicate_patterns(leads: &[LeadRecord]) -> (usize, usize, usize) {
    let mut groups: HashMap<String, usize> = HashMap::new();
    for email in leads.iter().filter_map(LeadRecord::email) {
        *groups.entry(email).or_insert(0) += 1;
    }

    let distinct = groups.len();
    let duplicate_groups = groups.values().filter(|&&count| count > 1).count();
    let total_duplicates = groups.values().map(|&count| count.saturating_sub(1)).sum();

    (distinct, duplicate_groups, total_duplicates)
}

/// Check if two leads share an identity key
pub fn are_duplicates(a: &LeadRecord, b: &LeadRecord) -> bool {
    match (a.email(), b.email()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
