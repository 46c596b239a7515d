//! Batch statistics report
//!
//! The report is a flat, ordered mapping of metric name to count. It is the
//! only thing handed to stats consumers; rendering (JSON, HTML, terminal)
//! belongs to the consumer.
//!
//! Key order: `total_raw_leads`, `leads_skipped`, `duplicates_removed`,
//! `final_processed_leads`, `successful_crm_updates`, `failed_crm_updates`,
//! `emails_sent`, `email_failures`.

use crate::Result;
use crate::app::services::pipeline::PipelineStats;
use crate::constants::metrics;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered metric mapping for one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    entries: Vec<(&'static str, usize)>,
}

impl StatsReport {
    pub fn entries(&self) -> &[(&'static str, usize)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
    }

    /// Largest metric value (0 for an empty batch)
    pub fn max_value(&self) -> usize {
        self.entries.iter().map(|(_, value)| *value).max().unwrap_or(0)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&PipelineStats> for StatsReport {
    fn from(stats: &PipelineStats) -> Self {
        Self {
            entries: vec![
                (metrics::TOTAL_RAW_LEADS, stats.cleanup.total_raw_leads),
                (metrics::LEADS_SKIPPED, stats.cleanup.leads_skipped()),
                (metrics::DUPLICATES_REMOVED, stats.cleanup.duplicates_removed),
                (metrics::FINAL_PROCESSED_LEADS, stats.final_processed_leads()),
                (metrics::SUCCESSFUL_CRM_UPDATES, stats.successful_crm_updates),
                (metrics::FAILED_CRM_UPDATES, stats.failed_crm_updates),
                (metrics::EMAILS_SENT, stats.emails_sent),
                (metrics::EMAIL_FAILURES, stats.email_failures),
            ],
        }
    }
}

impl Serialize for StatsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
