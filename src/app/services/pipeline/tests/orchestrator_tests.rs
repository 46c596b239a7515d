//! Tests for batch orchestration and the delivery gating rules

use super::*;
use crate::Error;
use crate::app::models::{DeliveryChannel, LeadRecord};
use crate::app::services::delivery::{
    CrmSender, Decision, MemoryNotificationLog, NotificationSender,
};
use crate::app::services::pipeline::{LeadPipeline, LeadState};
use crate::config::NotificationConfig;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_flagged_lead_never_reaches_notification() {
    let (mut pipeline, log) = create_test_pipeline(0.0);

    let run = pipeline
        .process(create_batch(&[("Charlie", "charlie_fail@example.com")]))
        .unwrap();

    assert_eq!(run.stats.failed_crm_updates, 1);
    assert_eq!(run.stats.successful_crm_updates, 0);
    assert_eq!(run.stats.emails_sent, 0);
    assert_eq!(run.stats.email_failures, 0);
    assert!(log.events().is_empty());

    let lead = &run.outcomes[0];
    assert_eq!(lead.state, LeadState::CrmSent { success: false });
    assert_eq!(lead.outcomes.len(), 1);
    assert!(lead.failure().unwrap().message().contains("failing test case"));
}

#[test]
fn test_bounce_fails_notification_after_crm_success() {
    let (mut pipeline, log) = create_test_pipeline(0.0);

    let run = pipeline
        .process(create_batch(&[("Diana", "diana_bounce@example.com")]))
        .unwrap();

    assert_eq!(run.stats.successful_crm_updates, 1);
    assert_eq!(run.stats.email_failures, 1);
    assert_eq!(run.stats.emails_sent, 0);
    assert!(log.events().is_empty());

    let lead = &run.outcomes[0];
    assert_eq!(lead.state, LeadState::Notified { success: false });
    let failure = lead.failure().unwrap();
    assert_eq!(failure.channel(), DeliveryChannel::Notification);
    assert!(failure.message().contains("bounce"));
}

#[test]
fn test_clean_lead_is_fully_delivered() {
    let (mut pipeline, log) = create_test_pipeline(0.0);

    let run = pipeline
        .process(create_batch(&[("Alice Smith", "alice@example.com")]))
        .unwrap();

    assert_eq!(run.stats.successful_crm_updates, 1);
    assert_eq!(run.stats.emails_sent, 1);
    assert!(run.outcomes[0].state.is_fully_delivered());

    let events = log.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].recipient, "alice@example.com");
    assert!(events[0].body.contains("Hi Alice Smith"));
}

#[test]
fn test_sample_sheet_counts() {
    let (mut pipeline, _log) = create_test_pipeline(0.0);

    let run = pipeline.process(sample_batch()).unwrap();

    assert_eq!(run.stats.cleanup.total_raw_leads, 4);
    assert_eq!(run.stats.successful_crm_updates, 3);
    assert_eq!(run.stats.failed_crm_updates, 1);
    assert_eq!(run.stats.emails_sent, 2);
    assert_eq!(run.stats.email_failures, 1);
    assert_eq!(run.stats.final_processed_leads(), 3);
    assert!(run.stats.is_gating_consistent());
}

#[test]
fn test_rate_above_one_fails_every_lead() {
    let (mut pipeline, log) = create_test_pipeline(1.5);

    let run = pipeline.process(sample_batch()).unwrap();

    assert_eq!(run.stats.failed_crm_updates, 4);
    assert_eq!(run.stats.successful_crm_updates, 0);
    assert!(log.events().is_empty());

    // The marker rule is checked before the random draw
    let charlie = &run.outcomes[2];
    assert!(charlie.failure().unwrap().message().contains("failing test case"));
    let alice = &run.outcomes[0];
    assert!(alice.failure().unwrap().message().contains("random"));
}

#[test]
fn test_gating_holds_under_random_failures() {
    for seed in 0..20 {
        let log = Arc::new(MemoryNotificationLog::new());
        let mut pipeline = LeadPipeline::from_config(
            &CrmConfig::default().with_failure_rate(0.5),
            &NotificationConfig::default(),
            &RandomConfig { seed: Some(seed) },
            log.clone(),
        )
        .unwrap();

        let run = pipeline.process(sample_batch()).unwrap();

        assert!(run.stats.is_gating_consistent(), "seed {}", seed);
        assert_eq!(run.stats.attempted_leads(), 4);
        assert_eq!(log.events().len(), run.stats.emails_sent);
    }
}

#[test]
fn test_same_seed_same_outcomes() {
    let states = |seed: u64| {
        let mut pipeline = LeadPipeline::from_config(
            &CrmConfig::default().with_failure_rate(0.5),
            &NotificationConfig::default(),
            &RandomConfig { seed: Some(seed) },
            Arc::new(MemoryNotificationLog::new()),
        )
        .unwrap();
        let run = pipeline.process(sample_batch()).unwrap();
        run.outcomes.iter().map(|o| o.state).collect::<Vec<_>>()
    };

    assert_eq!(states(7), states(7));
}

#[test]
fn test_leads_run_to_completion_in_order() {
    let calls: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let crm_calls = calls.clone();
    let crm = CrmSender::new(move |lead: &LeadRecord| {
        crm_calls
            .borrow_mut()
            .push(format!("crm:{}", lead.email().unwrap_or_default()));
        Decision::Accept
    });

    let notify_calls = calls.clone();
    let notifier = NotificationSender::with_decider(
        move |lead: &LeadRecord| {
            notify_calls
                .borrow_mut()
                .push(format!("notify:{}", lead.email().unwrap_or_default()));
            Decision::Accept
        },
        NotificationConfig::default(),
        Arc::new(MemoryNotificationLog::new()),
    )
    .unwrap();

    let mut pipeline = LeadPipeline::new(crm, notifier);
    pipeline
        .process(create_batch(&[("A", "a@x.com"), ("B", "b@x.com")]))
        .unwrap();

    assert_eq!(
        *calls.borrow(),
        vec!["crm:a@x.com", "notify:a@x.com", "crm:b@x.com", "notify:b@x.com"]
    );
}

#[test]
fn test_failure_does_not_abort_batch() {
    let crm = CrmSender::new(|lead: &LeadRecord| {
        if lead.email().as_deref() == Some("first@x.com") {
            Decision::reject("upstream timeout")
        } else {
            Decision::Accept
        }
    });
    let notifier = NotificationSender::new(
        NotificationConfig::default(),
        Arc::new(MemoryNotificationLog::new()),
    )
    .unwrap();

    let mut pipeline = LeadPipeline::new(crm, notifier);
    let run = pipeline
        .process(create_batch(&[("First", "first@x.com"), ("Second", "second@x.com")]))
        .unwrap();

    assert_eq!(run.outcomes.len(), 2);
    assert_eq!(run.outcomes[0].failure().unwrap().message(), "upstream timeout");
    assert!(run.outcomes[1].state.is_fully_delivered());
    assert_eq!(run.outcomes[1].index, 2);
    assert_eq!(run.outcomes[1].email().as_deref(), Some("second@x.com"));
}

#[test]
fn test_missing_email_column_aborts_before_delivery() {
    let (mut pipeline, log) = create_test_pipeline(0.0);
    let batch = RawBatch::from_rows(vec![LeadRecord::from_pairs([("Name", "Nobody")])]);

    let result = pipeline.process(batch);

    assert!(matches!(result, Err(Error::Schema { .. })));
    assert!(log.events().is_empty());
}

#[test]
fn test_empty_batch_reports_zeroes() {
    let (mut pipeline, _log) = create_test_pipeline(0.0);

    let run = pipeline.process(RawBatch::default()).unwrap();

    assert!(run.outcomes.is_empty());
    assert_eq!(run.stats, crate::app::services::pipeline::PipelineStats::default());
}

#[test]
fn test_blank_subject_is_configuration_error() {
    let config = NotificationConfig {
        subject: "  ".to_string(),
        ..Default::default()
    };
    let result = LeadPipeline::from_config(
        &CrmConfig::default(),
        &config,
        &RandomConfig::default(),
        Arc::new(MemoryNotificationLog::new()),
    );
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

/// CRM stand-in that labels its outcomes with the wrong channel
struct MislabelledCrm;

impl crate::app::services::delivery::LeadSender for MislabelledCrm {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::Crm
    }

    fn send(&mut self, lead: &LeadRecord) -> crate::app::models::DeliveryOutcome {
        crate::app::models::DeliveryOutcome::success(
            DeliveryChannel::Notification,
            "stored",
            lead.clone(),
        )
    }
}

#[test]
#[cfg_attr(debug_assertions, should_panic)]
fn test_counters_follow_the_step_that_ran() {
    let notifier = NotificationSender::new(
        NotificationConfig::default(),
        Arc::new(MemoryNotificationLog::new()),
    )
    .unwrap();
    let mut pipeline = LeadPipeline::new(MislabelledCrm, notifier);

    let run = pipeline
        .process(create_batch(&[("A", "a@x.com"), ("B", "b@x.com")]))
        .unwrap();

    assert_eq!(run.stats.successful_crm_updates, 2);
    assert_eq!(run.stats.emails_sent, 2);
    assert!(run.stats.is_gating_consistent());
    assert!(run.outcomes.iter().all(|o| o.state.is_fully_delivered()));
}
