//! Tests for the CRM simulator

use super::*;
use crate::Error;
use crate::app::models::DeliveryChannel;
use crate::app::services::delivery::random::stream_rng;
use crate::app::services::delivery::{
    CrmRules, CrmSender, Decision, DeliveryDecider, LatencySimulator, LeadSender,
};
use crate::config::{CrmConfig, RandomConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

fn seeded(seed: u64) -> RandomConfig {
    RandomConfig { seed: Some(seed) }
}

#[test]
fn test_fail_marker_rejects() {
    let mut sender = CrmSender::from_config(&CrmConfig::default(), &seeded(1)).unwrap();
    let lead = create_lead("Charlie Fail", "charlie_fail@example.com");

    let outcome = sender.send(&lead);

    assert!(!outcome.is_success());
    assert_eq!(outcome.channel(), DeliveryChannel::Crm);
    assert!(outcome.message().contains("failing test case"));
    assert_eq!(outcome.lead(), &lead);
}

#[test]
fn test_fail_marker_is_case_insensitive() {
    let mut rules = CrmRules::with_rng(0.0, StdRng::seed_from_u64(1));
    let decision = rules.decide(&create_lead("X", "Big.FAIL@example.com"));
    assert!(!decision.is_accept());
}

#[test]
fn test_zero_failure_rate_always_succeeds() {
    let mut sender = CrmSender::from_config(&CrmConfig::default(), &RandomConfig::default()).unwrap();
    for i in 0..50 {
        let outcome = sender.send(&create_lead("Lead", &format!("lead{}@example.com", i)));
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "lead stored in CRM");
    }
}

#[test]
fn test_failure_rate_above_one_clamps_to_always_fail() {
    let config = CrmConfig::default().with_failure_rate(1.5);
    let mut rules = CrmRules::from_config(&config, &seeded(3)).unwrap();
    assert_eq!(rules.failure_rate(), 1.0);

    for i in 0..50 {
        let decision = rules.decide(&create_lead("Lead", &format!("lead{}@example.com", i)));
        assert_eq!(decision, Decision::reject("random simulated failure"));
    }
}

#[test]
fn test_fail_marker_checked_before_random_failure() {
    let mut rules = CrmRules::with_rng(1.0, StdRng::seed_from_u64(3));
    let decision = rules.decide(&create_lead("C", "charlie_fail@example.com"));
    assert_eq!(decision, Decision::reject("email flagged as failing test case"));
}

#[test]
fn test_negative_failure_rate_clamps_to_zero() {
    let rules = CrmRules::with_rng(-3.0, StdRng::seed_from_u64(3));
    assert_eq!(rules.failure_rate(), 0.0);
}

#[test]
fn test_seeded_random_failures_are_reproducible() {
    let config = CrmConfig::default().with_failure_rate(0.5);
    let leads: Vec<_> = (0..40)
        .map(|i| create_lead("Lead", &format!("lead{}@example.com", i)))
        .collect();

    let run = |seed: u64| -> Vec<bool> {
        let mut sender = CrmSender::from_config(&config, &seeded(seed)).unwrap();
        leads.iter().map(|lead| sender.send(lead).is_success()).collect()
    };

    let first = run(11);
    assert_eq!(first, run(11));
    assert!(first.iter().any(|ok| *ok));
    assert!(first.iter().any(|ok| !*ok));
}

#[test]
fn test_latency_does_not_change_outcomes() {
    let leads: Vec<_> = (0..20)
        .map(|i| create_lead("Lead", &format!("lead{}@example.com", i)))
        .collect();

    let without = CrmConfig::default().with_failure_rate(0.5);
    let with = without.clone().with_latency(0.0, 0.001);

    let mut plain = CrmSender::from_config(&without, &seeded(5)).unwrap();
    let mut delayed = CrmSender::from_config(&with, &seeded(5)).unwrap();

    for lead in &leads {
        assert_eq!(plain.send(lead), delayed.send(lead));
    }
}

#[test]
fn test_latency_sampled_within_bounds() {
    let min = Duration::from_micros(100);
    let max = Duration::from_micros(300);
    let mut latency = LatencySimulator::new(min, max, stream_rng(Some(9), 1)).unwrap();

    for _ in 0..100 {
        let delay = latency.sample();
        assert!(delay >= min && delay <= max);
    }
}

#[test]
fn test_inverted_latency_bounds_rejected() {
    let result = LatencySimulator::new(
        Duration::from_millis(5),
        Duration::from_millis(1),
        StdRng::seed_from_u64(1),
    );
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_non_finite_config_rejected_at_construction() {
    let config = CrmConfig::default().with_failure_rate(f64::NAN);
    assert!(matches!(
        CrmSender::from_config(&config, &RandomConfig::default()),
        Err(Error::Configuration { .. })
    ));

    let config = CrmConfig::default().with_latency(f64::NAN, 1.0);
    assert!(matches!(
        LatencySimulator::from_config(&config, &RandomConfig::default()),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn test_custom_decider() {
    let mut sender = CrmSender::new(|lead: &LeadRecord| match lead.name() {
        Some(_) => Decision::Accept,
        None => Decision::reject("rejected by remote API"),
    });

    assert!(sender.send(&create_lead("Named", "a@x.com")).is_success());
    let outcome = sender.send(&LeadRecord::from_pairs([("Email", "b@x.com")]));
    assert!(!outcome.is_success());
    assert_eq!(outcome.message(), "rejected by remote API");
}
