//! Collaborator interfaces at the edges of the pipeline
//!
//! The core reads rows from a [`RowSource`], writes the cleaned set to a
//! [`RowSink`] and hands the final metrics to a [`StatsConsumer`]. File
//! formats and report rendering live behind these traits.

use crate::Result;
use crate::app::models::{LeadRecord, RawBatch};
use crate::app::services::reporting::StatsReport;

/// Supplies an ordered batch of raw rows
pub trait RowSource {
    fn read_batch(&mut self) -> Result<RawBatch>;

    /// Human-readable origin of the rows, for log messages
    fn describe(&self) -> String {
        "rows".to_string()
    }
}

/// Accepts the ordered cleaned rows
pub trait RowSink {
    fn write_rows(&mut self, columns: &[String], rows: &[LeadRecord]) -> Result<()>;

    fn describe(&self) -> String {
        "rows".to_string()
    }
}

/// Receives the ordered metric mapping at the end of a batch
pub trait StatsConsumer {
    fn consume(&mut self, report: &StatsReport) -> Result<()>;
}

impl<C: StatsConsumer + ?Sized> StatsConsumer for Box<C> {
    fn consume(&mut self, report: &StatsReport) -> Result<()> {
        (**self).consume(report)
    }
}

/// Every consumer in order; the first failure stops the chain
impl StatsConsumer for Vec<Box<dyn StatsConsumer>> {
    fn consume(&mut self, report: &StatsReport) -> Result<()> {
        for consumer in self.iter_mut() {
            consumer.consume(report)?;
        }
        Ok(())
    }
}
