//! Cleanup statistics and result structures
//!
//! This module provides the per-batch counters produced by the cleanup stage
//! and the container handing cleaned leads to the delivery stage.

use crate::app::models::LeadRecord;
use serde::{Deserialize, Serialize};

/// Counters for one cleanup run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupStats {
    /// Rows in the batch before any filtering
    pub total_raw_leads: usize,
    /// Rows dropped because Email was absent or blank
    pub leads_skipped_missing_email: usize,
    /// Rows dropped because an earlier row had the same Email
    pub duplicates_removed: usize,
}

impl CleanupStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leads skipped for any reason (currently only missing email)
    pub fn leads_skipped(&self) -> usize {
        self.leads_skipped_missing_email
    }

    /// Number of leads that survive cleanup
    pub fn retained(&self) -> usize {
        self.total_raw_leads
            .saturating_sub(self.leads_skipped_missing_email)
            .saturating_sub(self.duplicates_removed)
    }

    /// Check the counters add up against a cleaned set of `cleaned_len` leads
    pub fn is_consistent_with(&self, cleaned_len: usize) -> bool {
        self.total_raw_leads
            == cleaned_len + self.leads_skipped_missing_email + self.duplicates_removed
    }

    /// Get summary of cleanup statistics
    pub fn summary(&self) -> String {
        format!(
            "{} raw leads -> {} kept | {} skipped (missing email) | {} duplicates removed",
            self.total_raw_leads,
            self.retained(),
            self.leads_skipped_missing_email,
            self.duplicates_removed
        )
    }
}

/// Result of the cleanup stage
#[derive(Debug, Clone)]
pub struct CleanupResult {
    /// Normalised schema of the batch
    pub columns: Vec<String>,
    /// Surviving leads in original relative order
    pub leads: Vec<LeadRecord>,
    pub stats: CleanupStats,
}

impl CleanupResult {
    pub fn new(columns: Vec<String>, leads: Vec<LeadRecord>, stats: CleanupStats) -> Self {
        Self {
            columns,
            leads,
            stats,
        }
    }

    pub fn lead_count(&self) -> usize {
        self.leads.len()
    }

    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
