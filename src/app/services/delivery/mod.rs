//! Simulated delivery of leads to external systems
//!
//! Two collaborators stand in for real integrations:
//! - [`crm::CrmSender`] registers a lead in the CRM
//! - [`notification::NotificationSender`] sends the welcome email
//!
//! Each sender delegates the accept/reject choice to a [`DeliveryDecider`],
//! so the business rules used by the simulators ("fail" and "bounce" markers,
//! random failure rate) can be swapped for a real client's error
//! classification without touching the pipeline. Senders never return an
//! error for a rejected lead: the rejection is a [`DeliveryOutcome`] value.

pub mod crm;
pub mod latency;
pub mod notification;
pub mod random;

#[cfg(test)]
pub mod tests;

use crate::app::models::{DeliveryChannel, DeliveryOutcome, LeadRecord};

pub use crm::{CrmRules, CrmSender};
pub use latency::LatencySimulator;
pub use notification::{
    MemoryNotificationLog, NotificationLog, NotificationRules, NotificationSender,
    TracingNotificationLog, WelcomeEmail,
};

/// Verdict of a delivery rule for one lead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    /// Rejected, with the reason reported in the outcome message
    Reject(String),
}

impl Decision {
    pub fn reject(reason: impl Into<String>) -> Self {
        Decision::Reject(reason.into())
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

/// Classifies a delivery attempt as accepted or rejected
pub trait DeliveryDecider {
    fn decide(&mut self, lead: &LeadRecord) -> Decision;
}

impl<F> DeliveryDecider for F
where
    F: FnMut(&LeadRecord) -> Decision,
{
    fn decide(&mut self, lead: &LeadRecord) -> Decision {
        self(lead)
    }
}

/// Sends one lead to one external step
pub trait LeadSender {
    fn channel(&self) -> DeliveryChannel;

    /// Attempt delivery; failures are reported in the outcome, never raised
    fn send(&mut self, lead: &LeadRecord) -> DeliveryOutcome;
}

impl<S: LeadSender + ?Sized> LeadSender for Box<S> {
    fn channel(&self) -> DeliveryChannel {
        (**self).channel()
    }

    fn send(&mut self, lead: &LeadRecord) -> DeliveryOutcome {
        (**self).send(lead)
    }
}

/// Wrap a decision into an outcome for `channel`
pub(crate) fn outcome_from_decision(
    channel: DeliveryChannel,
    decision: Decision,
    success_message: &str,
    lead: &LeadRecord,
) -> DeliveryOutcome {
    match decision {
        Decision::Accept => DeliveryOutcome::success(channel, success_message, lead.clone()),
        Decision::Reject(reason) => DeliveryOutcome::failure(channel, reason, lead.clone()),
    }
}
