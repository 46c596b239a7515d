//! Mock CRM integration
//!
//! Simulates a per-lead CRM API call with controlled failures:
//! - an Email containing "fail" (any case) is always rejected
//! - otherwise a random draw below the configured failure rate rejects the lead
//! - optional latency is simulated before the decision

use crate::app::models::{DeliveryChannel, DeliveryOutcome, LeadRecord};
use crate::config::{CrmConfig, RandomConfig};
use crate::constants::crm;
use crate::Result;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use super::latency::LatencySimulator;
use super::random::{CRM_OUTCOME_STREAM, stream_rng};
use super::{Decision, DeliveryDecider, LeadSender, outcome_from_decision};

/// CRM acceptance rules: failing-test-case marker, then random failure rate
#[derive(Debug)]
pub struct CrmRules<R = StdRng> {
    failure_rate: f64,
    rng: R,
}

impl CrmRules<StdRng> {
    pub fn from_config(config: &CrmConfig, random: &RandomConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_rng(
            config.clamped_failure_rate(),
            stream_rng(random.seed, CRM_OUTCOME_STREAM),
        ))
    }
}

impl<R: Rng> CrmRules<R> {
    /// Create rules with an explicit random source; the rate is clamped to [0, 1]
    pub fn with_rng(failure_rate: f64, rng: R) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self { failure_rate, rng }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl<R: Rng> DeliveryDecider for CrmRules<R> {
    fn decide(&mut self, lead: &LeadRecord) -> Decision {
        let email = lead.email().unwrap_or_default();

        if email.to_lowercase().contains(crm::FAIL_MARKER) {
            return Decision::reject(crm::FLAGGED_FAILURE);
        }

        if self.failure_rate > 0.0 && self.rng.r#gen::<f64>() < self.failure_rate {
            return Decision::reject(crm::RANDOM_FAILURE);
        }

        Decision::Accept
    }
}

/// Simulated CRM client
#[derive(Debug)]
pub struct CrmSender<D = CrmRules> {
    decider: D,
    latency: Option<LatencySimulator>,
}

impl CrmSender<CrmRules> {
    /// Build the default simulator from configuration
    ///
    /// Fails with a configuration error for non-finite rates or latency bounds.
    pub fn from_config(config: &CrmConfig, random: &RandomConfig) -> Result<Self> {
        let decider = CrmRules::from_config(config, random)?;
        let latency = LatencySimulator::from_config(config, random)?;
        debug!(
            "CRM simulator: failure rate {:.2}, latency {:?}",
            decider.failure_rate(),
            latency.as_ref().map(LatencySimulator::bounds)
        );
        Ok(Self { decider, latency })
    }
}

impl<D: DeliveryDecider> CrmSender<D> {
    /// Create a sender around a custom decider, without latency
    pub fn new(decider: D) -> Self {
        Self {
            decider,
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: LatencySimulator) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn decider(&self) -> &D {
        &self.decider
    }
}

impl<D: DeliveryDecider> LeadSender for CrmSender<D> {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::Crm
    }

    fn send(&mut self, lead: &LeadRecord) -> DeliveryOutcome {
        if let Some(latency) = self.latency.as_mut() {
            latency.wait();
        }

        let decision = self.decider.decide(lead);
        outcome_from_decision(DeliveryChannel::Crm, decision, crm::STORED, lead)
    }
}
