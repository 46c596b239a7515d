//! Pipeline statistics and result structures
//!
//! This module provides the batch counters accumulated by the orchestrator
//! and the result handed back after a batch has run.

use crate::app::models::{DeliveryChannel, DeliveryOutcome, LeadRecord};
use crate::app::services::cleanup::{CleanupResult, CleanupStats};
use crate::app::services::reporting::StatsReport;

use super::state::LeadState;

/// Counters for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub cleanup: CleanupStats,
    pub successful_crm_updates: usize,
    pub failed_crm_updates: usize,
    pub emails_sent: usize,
    pub email_failures: usize,
}

impl PipelineStats {
    pub fn new(cleanup: CleanupStats) -> Self {
        Self {
            cleanup,
            ..Default::default()
        }
    }

    /// Leads that made it into the CRM
    pub fn final_processed_leads(&self) -> usize {
        self.successful_crm_updates
    }

    /// Count one delivery outcome against the counter for its step
    pub fn record_outcome(&mut self, outcome: &DeliveryOutcome) {
        self.record(outcome.channel(), outcome.is_success());
    }

    /// Count one finished `channel` step
    pub fn record(&mut self, channel: DeliveryChannel, success: bool) {
        let counter = match (channel, success) {
            (DeliveryChannel::Crm, true) => &mut self.successful_crm_updates,
            (DeliveryChannel::Crm, false) => &mut self.failed_crm_updates,
            (DeliveryChannel::Notification, true) => &mut self.emails_sent,
            (DeliveryChannel::Notification, false) => &mut self.email_failures,
        };
        *counter += 1;
    }

    /// Every notification attempt followed a CRM success
    pub fn is_gating_consistent(&self) -> bool {
        self.emails_sent + self.email_failures == self.successful_crm_updates
    }

    /// Leads that went through delivery
    pub fn attempted_leads(&self) -> usize {
        self.successful_crm_updates + self.failed_crm_updates
    }

    /// Flat ordered metric mapping for consumers
    pub fn report(&self) -> StatsReport {
        StatsReport::from(self)
    }

    /// Get summary of pipeline statistics
    pub fn summary(&self) -> String {
        format!(
            "Total raw leads: {}, Leads skipped: {}, Duplicates removed: {}, Final processed leads: {}",
            self.cleanup.total_raw_leads,
            self.cleanup.leads_skipped(),
            self.cleanup.duplicates_removed,
            self.final_processed_leads()
        )
    }
}

/// Delivery history of one lead
#[derive(Debug, Clone)]
pub struct LeadOutcome {
    /// Position of the lead in the cleaned set (1-based)
    pub index: usize,
    pub state: LeadState,
    /// Outcomes in the order the steps ran
    pub outcomes: Vec<DeliveryOutcome>,
}

impl LeadOutcome {
    pub fn lead(&self) -> Option<&LeadRecord> {
        self.outcomes.first().map(DeliveryOutcome::lead)
    }

    pub fn email(&self) -> Option<String> {
        self.lead().and_then(LeadRecord::email)
    }

    /// The outcome that ended this lead's run, if it failed
    pub fn failure(&self) -> Option<&DeliveryOutcome> {
        self.outcomes.iter().find(|outcome| !outcome.is_success())
    }
}

/// Result of a full batch run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub cleanup: CleanupResult,
    pub outcomes: Vec<LeadOutcome>,
    pub stats: PipelineStats,
}

impl PipelineRun {
    pub fn cleaned_leads(&self) -> &[LeadRecord] {
        &self.cleanup.leads
    }

    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
