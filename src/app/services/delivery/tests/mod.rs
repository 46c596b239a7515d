//! Tests for the delivery simulators

pub mod crm_tests;

use crate::app::models::LeadRecord;

/// Create a cleaned lead with a name and email
pub fn create_lead(name: &str, email: &str) -> LeadRecord {
    LeadRecord::from_pairs([("Name", name), ("Email", email)])
}
