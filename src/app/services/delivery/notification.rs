//! Mock welcome-email sender
//!
//! Emails are logged instead of sent. Invalid addresses and "bounce" test
//! addresses are rejected; accepted emails go to a [`NotificationLog`].

use crate::app::models::{DeliveryChannel, DeliveryOutcome, LeadRecord};
use crate::config::NotificationConfig;
use crate::constants::notification;
use crate::{Error, Result};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use super::{Decision, DeliveryDecider, LeadSender, outcome_from_decision};

/// A composed welcome email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Receives every welcome email the simulator "sends"
pub trait NotificationLog {
    fn record(&self, email: &WelcomeEmail);
}

/// Emits each welcome email as a structured `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationLog;

impl NotificationLog for TracingNotificationLog {
    fn record(&self, email: &WelcomeEmail) {
        info!(
            recipient = %email.recipient,
            subject = %email.subject,
            body = %email.body,
            "Sending welcome email"
        );
    }
}

/// Keeps welcome emails in memory
#[derive(Debug, Default)]
pub struct MemoryNotificationLog {
    events: Mutex<Vec<WelcomeEmail>>,
}

impl MemoryNotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WelcomeEmail> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationLog for MemoryNotificationLog {
    fn record(&self, email: &WelcomeEmail) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email.clone());
    }
}

/// Notification acceptance rules: address must contain '@' and must not be a bounce test
#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationRules;

impl DeliveryDecider for NotificationRules {
    fn decide(&mut self, lead: &LeadRecord) -> Decision {
        let email = lead.email().unwrap_or_default();

        if email.is_empty() || !email.contains('@') {
            return Decision::reject(notification::INVALID_ADDRESS);
        }

        if email.to_lowercase().contains(notification::BOUNCE_MARKER) {
            return Decision::reject(notification::BOUNCED);
        }

        Decision::Accept
    }
}

/// Simulated welcome-email client
pub struct NotificationSender<D = NotificationRules> {
    decider: D,
    config: NotificationConfig,
    log: Arc<dyn NotificationLog>,
}

impl NotificationSender<NotificationRules> {
    /// Build the default simulator; the subject line must not be blank
    pub fn new(config: NotificationConfig, log: Arc<dyn NotificationLog>) -> Result<Self> {
        Self::with_decider(NotificationRules, config, log)
    }
}

impl<D: DeliveryDecider> NotificationSender<D> {
    pub fn with_decider(
        decider: D,
        config: NotificationConfig,
        log: Arc<dyn NotificationLog>,
    ) -> Result<Self> {
        if config.subject.trim().is_empty() {
            return Err(Error::configuration(
                "Notification subject must not be empty",
            ));
        }
        Ok(Self {
            decider,
            config,
            log,
        })
    }

    /// Compose the welcome email for a lead, greeting it by Name when present
    pub fn compose(&self, lead: &LeadRecord) -> WelcomeEmail {
        let name = lead
            .name()
            .unwrap_or_else(|| self.config.fallback_name.clone());
        WelcomeEmail {
            recipient: lead.email().unwrap_or_default(),
            subject: self.config.subject.clone(),
            body: format!(
                "Hi {},\n\nThank you for your interest. We will be in touch shortly.\n",
                name
            ),
        }
    }
}

impl<D: DeliveryDecider> LeadSender for NotificationSender<D> {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::Notification
    }

    fn send(&mut self, lead: &LeadRecord) -> DeliveryOutcome {
        let decision = self.decider.decide(lead);
        if decision.is_accept() {
            self.log.record(&self.compose(lead));
        }
        outcome_from_decision(
            DeliveryChannel::Notification,
            decision,
            notification::SENT,
            lead,
        )
    }
}
