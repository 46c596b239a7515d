//! Lead Pipeline Library
//!
//! A Rust library for running a daily batch of sales leads through cleanup,
//! CRM registration and a welcome notification, then summarising the outcome.
//!
//! This library provides tools for:
//! - Normalising arbitrary lead-sheet column labels to a canonical field set
//! - Dropping leads without an email address and removing duplicate identities
//! - Simulated CRM and notification senders with rule-based and random failures
//! - Sequencing each lead through CRM then notification, gated on CRM success
//! - Aggregating batch statistics into an ordered metric report
//! - Reading and writing lead sheets as CSV or Parquet

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod ports;
    pub mod services {
        pub mod cleanup;
        pub mod delivery;
        pub mod normalizer;
        pub mod pipeline;
        pub mod reporting;
    }
    pub mod adapters {
        pub mod report_writers;
        pub mod tabular;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CellValue, DeliveryOutcome, LeadRecord, RawBatch};
pub use app::services::pipeline::{LeadPipeline, PipelineStats, run_batch};
pub use config::Config;

/// Result type alias for the lead pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lead pipeline operations
///
/// Per-lead delivery failures are not errors: they are reported as
/// [`DeliveryOutcome`] values and counted in the batch statistics.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file missing
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    /// CSV reading or writing error
    #[error("CSV error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Parquet reading or writing error
    #[error("Parquet error: {message}")]
    Parquet {
        message: String,
        #[source]
        source: polars::error::PolarsError,
    },

    /// Batch is structurally unusable (e.g. no Email column)
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Invalid simulator or application configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Report serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File extension has no tabular adapter
    #[error("Unsupported tabular format for '{path}': expected .csv or .parquet")]
    UnsupportedFormat { path: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a CSV error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a Parquet error with context
    pub fn parquet(message: impl Into<String>, source: polars::error::PolarsError) -> Self {
        Self::Parquet {
            message: message.into(),
            source,
        }
    }

    /// Create a structural (schema) error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: impl Into<String>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Structural and configuration errors abort a run before any lead is delivered
    pub fn is_fatal_before_delivery(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::Configuration { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV processing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::Parquet {
            message: "Parquet processing failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid config file: {}", error),
        }
    }
}
