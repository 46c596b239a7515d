//! Tests for the cleanup stage
//!
//! Shared fixtures for building raw lead batches.


use crate::app::models::{CellValue, LeadRecord, RawBatch};

/// Create a lead with the canonical columns
pub fn create_test_lead(name: &str, email: &str) -> LeadRecord {
    LeadRecord::from_pairs([
        ("Name", CellValue::from(name)),
        ("Email", CellValue::from(email)),
        ("Phone", CellValue::from("555-0100")),
        ("Source", CellValue::from("Website")),
        ("Created Date", CellValue::from("2024-05-01")),
    ])
}

/// Create a batch of leads from (name, email) pairs
pub fn create_test_batch(leads: &[(&str, &str)]) -> RawBatch {
    RawBatch::from_rows(
        leads
            .iter()
            .map(|(name, email)| create_test_lead(name, email))
            .collect(),
    )
}

/// Emails of a set of leads, in order
pub fn emails_of(leads: &[LeadRecord]) -> Vec<String> {
    leads.iter().filter_map(LeadRecord::email).collect()
}
