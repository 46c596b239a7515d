//! Tests for the batch entry point

use super::*;
use crate::Error;
use crate::app::adapters::tabular::{MemoryRowSink, MemoryRowSource};
use crate::app::ports::StatsConsumer;
use crate::app::services::pipeline::{BatchOptions, run_batch};
use crate::app::services::reporting::StatsReport;

/// Captures every report it is handed
#[derive(Default)]
struct RecordingConsumer {
    reports: Vec<StatsReport>,
}

impl StatsConsumer for RecordingConsumer {
    fn consume(&mut self, report: &StatsReport) -> crate::Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

fn options(log: Arc<MemoryNotificationLog>) -> BatchOptions {
    BatchOptions {
        random: RandomConfig { seed: Some(3) },
        show_progress: false,
        notification_log: log,
    }
}

#[test]
fn test_run_batch_end_to_end() {
    let log = Arc::new(MemoryNotificationLog::new());
    let mut batch = sample_batch();
    batch.rows.push(LeadRecord::from_pairs([("Name", "Alice Again"), ("Email", "alice@example.com")]));
    batch.rows.push(LeadRecord::from_pairs([("Name", "No Email"), ("Email", "")]));

    let mut source = MemoryRowSource::new(batch);
    let mut sink = MemoryRowSink::new();
    let mut consumer = RecordingConsumer::default();

    let stats = run_batch(
        &mut source,
        &mut sink,
        &mut consumer,
        &CrmConfig::default(),
        &NotificationConfig::default(),
        &options(log.clone()),
    )
    .unwrap();

    assert_eq!(sink.writes(), 1);
    assert_eq!(sink.rows.len(), 4);
    assert_eq!(sink.columns, vec!["Name", "Email"]);

    assert_eq!(consumer.reports.len(), 1);
    let report = &consumer.reports[0];
    assert_eq!(report.get("total_raw_leads"), Some(6));
    assert_eq!(report.get("leads_skipped"), Some(1));
    assert_eq!(report.get("duplicates_removed"), Some(1));
    assert_eq!(report.get("final_processed_leads"), Some(3));
    assert_eq!(report.get("emails_sent"), Some(2));
    assert_eq!(*report, stats.report());
    assert_eq!(log.events().len(), 2);
}

#[test]
fn test_schema_error_writes_nothing() {
    let mut source = MemoryRowSource::new(RawBatch::from_rows(vec![LeadRecord::from_pairs([
        ("Name", "Alice"),
        ("Phone", "555-0101"),
    ])]));
    let mut sink = MemoryRowSink::new();
    let mut consumer = RecordingConsumer::default();

    let result = run_batch(
        &mut source,
        &mut sink,
        &mut consumer,
        &CrmConfig::default(),
        &NotificationConfig::default(),
        &BatchOptions::default(),
    );

    assert!(matches!(result, Err(Error::Schema { .. })));
    assert_eq!(sink.writes(), 0);
    assert!(consumer.reports.is_empty());
}

#[test]
fn test_configuration_error_fails_before_reading() {
    let mut source = MemoryRowSource::new(sample_batch());
    let mut sink = MemoryRowSink::new();
    let mut consumer = RecordingConsumer::default();
    let crm = CrmConfig {
        failure_rate: f64::NAN,
        ..Default::default()
    };

    let result = run_batch(
        &mut source,
        &mut sink,
        &mut consumer,
        &crm,
        &NotificationConfig::default(),
        &BatchOptions::default(),
    );

    assert!(matches!(result, Err(Error::Configuration { .. })));
    assert_eq!(source.reads(), 0);
    assert_eq!(sink.writes(), 0);
    assert!(consumer.reports.is_empty());
}

#[test]
fn test_every_lead_failing_still_reports() {
    let mut source = MemoryRowSource::new(sample_batch());
    let mut sink = MemoryRowSink::new();
    let mut consumer = RecordingConsumer::default();

    let stats = run_batch(
        &mut source,
        &mut sink,
        &mut consumer,
        &CrmConfig::default().with_failure_rate(1.0),
        &NotificationConfig::default(),
        &options(Arc::new(MemoryNotificationLog::new())),
    )
    .unwrap();

    assert_eq!(stats.failed_crm_updates, 4);
    assert_eq!(consumer.reports[0].get("final_processed_leads"), Some(0));
}
