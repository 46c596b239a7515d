//! Tests for the pipeline orchestrator
//!
//! Shared fixtures for building pipelines around the simulated senders.

pub mod batch_tests;
pub mod orchestrator_tests;

use crate::app::models::{LeadRecord, RawBatch};
use crate::app::services::delivery::{CrmSender, MemoryNotificationLog, NotificationSender};
use crate::app::services::pipeline::LeadPipeline;
use crate::config::{CrmConfig, NotificationConfig, RandomConfig};
use std::sync::Arc;

/// Pipeline with deterministic simulators and a capturing notification log
pub fn create_test_pipeline(
    failure_rate: f64,
) -> (
    LeadPipeline<CrmSender, NotificationSender>,
    Arc<MemoryNotificationLog>,
) {
    let log = Arc::new(MemoryNotificationLog::new());
    let pipeline = LeadPipeline::from_config(
        &CrmConfig::default().with_failure_rate(failure_rate),
        &NotificationConfig::default(),
        &RandomConfig { seed: Some(42) },
        log.clone(),
    )
    .unwrap();
    (pipeline, log)
}

/// Batch of (Name, Email) rows
pub fn create_batch(leads: &[(&str, &str)]) -> RawBatch {
    RawBatch::from_rows(
        leads
            .iter()
            .map(|(name, email)| LeadRecord::from_pairs([("Name", *name), ("Email", *email)]))
            .collect(),
    )
}

/// The four leads of the daily sample sheet
pub fn sample_batch() -> RawBatch {
    create_batch(&[
        ("Alice Smith", "alice@example.com"),
        ("Bob Jones", "bob@example.com"),
        ("Charlie Fail", "charlie_fail@example.com"),
        ("Diana Bounce", "diana_bounce@example.com"),
    ])
}
