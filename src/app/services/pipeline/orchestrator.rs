//! Batch orchestration: cleanup, then per-lead CRM and notification delivery
//!
//! Leads are processed strictly one after another. Each lead runs its whole
//! state machine (CRM, then notification if CRM succeeded) before the next
//! lead starts. A failed delivery never stops the batch.

use crate::Result;
use crate::app::models::{DeliveryChannel, LeadRecord, RawBatch};
use crate::app::services::cleanup::{CleanupResult, clean_leads};
use crate::app::services::delivery::{
    CrmSender, LeadSender, NotificationLog, NotificationSender,
};
use crate::config::{CrmConfig, NotificationConfig, RandomConfig};
use crate::constants::PROGRESS_TEMPLATE;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::state::LeadState;
use super::stats::{LeadOutcome, PipelineRun, PipelineStats};

/// Drives cleaned leads through the CRM and notification senders
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use lead_pipeline::app::models::{LeadRecord, RawBatch};
/// use lead_pipeline::app::services::delivery::MemoryNotificationLog;
/// use lead_pipeline::app::services::pipeline::LeadPipeline;
/// use lead_pipeline::config::{CrmConfig, NotificationConfig, RandomConfig};
///
/// # fn example() -> lead_pipeline::Result<()> {
/// let mut pipeline = LeadPipeline::from_config(
///     &CrmConfig::default(),
///     &NotificationConfig::default(),
///     &RandomConfig { seed: Some(1) },
///     Arc::new(MemoryNotificationLog::new()),
/// )?;
///
/// let batch = RawBatch::from_rows(vec![
///     LeadRecord::from_pairs([("Name", "Alice"), ("Email", "alice@example.com")]),
///     LeadRecord::from_pairs([("Name", "Charlie"), ("Email", "charlie_fail@example.com")]),
/// ]);
///
/// let run = pipeline.process(batch)?;
/// assert_eq!(run.stats.successful_crm_updates, 1);
/// assert_eq!(run.stats.failed_crm_updates, 1);
/// assert_eq!(run.stats.emails_sent, 1);
/// # Ok(())
/// # }
/// ```
pub struct LeadPipeline<C, N> {
    crm: C,
    notifier: N,
    show_progress: bool,
}

impl LeadPipeline<CrmSender, NotificationSender> {
    /// Build a pipeline around the simulated senders
    ///
    /// Configuration errors surface here, before any batch is read.
    pub fn from_config(
        crm_config: &CrmConfig,
        notification_config: &NotificationConfig,
        random: &RandomConfig,
        notification_log: Arc<dyn NotificationLog>,
    ) -> Result<Self> {
        let crm = CrmSender::from_config(crm_config, random)?;
        let notifier = NotificationSender::new(notification_config.clone(), notification_log)?;
        Ok(Self::new(crm, notifier))
    }
}

impl<C: LeadSender, N: LeadSender> LeadPipeline<C, N> {
    pub fn new(crm: C, notifier: N) -> Self {
        Self {
            crm,
            notifier,
            show_progress: false,
        }
    }

    /// Show a progress bar over the delivery loop
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Clean the batch and deliver every surviving lead
    pub fn process(&mut self, batch: RawBatch) -> Result<PipelineRun> {
        let cleanup = clean_leads(batch)?;
        Ok(self.deliver(cleanup))
    }

    /// Deliver an already-cleaned set of leads
    pub fn deliver(&mut self, cleanup: CleanupResult) -> PipelineRun {
        let mut stats = PipelineStats::new(cleanup.stats);
        let total = cleanup.leads.len();

        info!("Starting delivery for {} cleaned leads", total);

        let progress = self.show_progress.then(|| create_delivery_progress_bar(total as u64));

        let mut outcomes = Vec::with_capacity(total);
        for (offset, lead) in cleanup.leads.iter().enumerate() {
            let outcome = self.deliver_lead(offset + 1, lead, &mut stats);
            outcomes.push(outcome);

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!(
                "Delivery complete: {} of {} leads in CRM",
                stats.successful_crm_updates, total
            ));
        }

        info!(
            "Delivery complete: {} CRM updates ({} failed), {} emails sent ({} failed)",
            stats.successful_crm_updates,
            stats.failed_crm_updates,
            stats.emails_sent,
            stats.email_failures
        );

        PipelineRun {
            cleanup,
            outcomes,
            stats,
        }
    }

    /// Run one lead's state machine to a terminal state
    fn deliver_lead(
        &mut self,
        index: usize,
        lead: &LeadRecord,
        stats: &mut PipelineStats,
    ) -> LeadOutcome {
        let email = lead.email().unwrap_or_default();
        debug!(index, email = %email, "Processing lead");

        let mut state = LeadState::Pending;
        let mut outcomes = Vec::with_capacity(2);

        while let Some(channel) = state.awaits() {
            let outcome = match channel {
                DeliveryChannel::Crm => self.crm.send(lead),
                DeliveryChannel::Notification => self.notifier.send(lead),
            };

            debug_assert_eq!(outcome.channel(), channel);
            let success = outcome.is_success();

            // Counted against the step that ran, whatever the sender reports
            stats.record(channel, success);
            if !success {
                warn!(
                    index,
                    email = %email,
                    reason = %outcome.message(),
                    "{} delivery failed for lead",
                    channel
                );
            }

            let next = state.after_step(channel, success);
            outcomes.push(outcome);
            match next {
                Some(next) => state = next,
                None => break,
            }
        }

        debug!(index, email = %email, state = %state, "Lead finished");

        LeadOutcome {
            index,
            state,
            outcomes,
        }
    }
}

/// Create a progress bar for the delivery loop
fn create_delivery_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Delivering leads");
    pb
}
