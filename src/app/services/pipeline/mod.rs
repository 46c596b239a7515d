//! Lead processing pipeline
//!
//! - [`orchestrator`] - [`LeadPipeline`], sequencing cleanup and per-lead delivery
//! - [`state`] - the per-lead delivery state machine
//! - [`stats`] - batch counters and run results
//!
//! [`run_batch`] is the single entry point for a complete run: read rows,
//! clean them, write the cleaned set, deliver each lead and publish the
//! metric report.

pub mod orchestrator;
pub mod state;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use orchestrator::LeadPipeline;
pub use state::LeadState;
pub use stats::{LeadOutcome, PipelineRun, PipelineStats};

use crate::Result;
use crate::app::ports::{RowSink, RowSource, StatsConsumer};
use crate::app::services::cleanup::clean_leads;
use crate::app::services::delivery::{NotificationLog, TracingNotificationLog};
use crate::config::{CrmConfig, NotificationConfig, RandomConfig};
use std::sync::Arc;
use tracing::info;

/// Run-time options for [`run_batch`] besides the simulator configuration
#[derive(Clone)]
pub struct BatchOptions {
    pub random: RandomConfig,
    pub show_progress: bool,
    pub notification_log: Arc<dyn NotificationLog>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            random: RandomConfig::default(),
            show_progress: false,
            notification_log: Arc::new(TracingNotificationLog),
        }
    }
}

/// Process one batch start to finish and return the frozen statistics
///
/// Order of effects:
/// 1. simulators are built (configuration errors abort here)
/// 2. rows are read from `source`
/// 3. cleanup runs (a missing Email column aborts here, nothing is written)
/// 4. the cleaned rows are written to `sink`
/// 5. every cleaned lead is delivered
/// 6. the metric report is handed to `consumer`
pub fn run_batch(
    source: &mut dyn RowSource,
    sink: &mut dyn RowSink,
    consumer: &mut dyn StatsConsumer,
    crm_config: &CrmConfig,
    notification_config: &NotificationConfig,
    options: &BatchOptions,
) -> Result<PipelineStats> {
    let mut pipeline = LeadPipeline::from_config(
        crm_config,
        notification_config,
        &options.random,
        options.notification_log.clone(),
    )?
    .with_progress(options.show_progress);

    info!("Reading leads from {}", source.describe());
    let batch = source.read_batch()?;

    let cleanup = clean_leads(batch)?;
    sink.write_rows(&cleanup.columns, &cleanup.leads)?;
    info!(
        "Wrote {} cleaned leads to {}",
        cleanup.lead_count(),
        sink.describe()
    );

    let run = pipeline.deliver(cleanup);
    consumer.consume(&run.stats.report())?;

    info!("{}", run.stats.summary());
    Ok(run.stats)
}
