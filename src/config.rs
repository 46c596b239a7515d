//! Configuration management and validation.
//!
//! Provides configuration structures for the CRM and notification simulators,
//! the random source and the file paths a batch run reads and writes.
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables, then command-line overrides.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CLEANED_OUTPUT_PATH, DEFAULT_INPUT_PATH,
    DEFAULT_REPORT_PATH, env, notification,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// CRM simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    /// Probability in [0, 1] of a random failure (out-of-range values are clamped)
    pub failure_rate: f64,

    /// Lower bound of simulated call latency in seconds
    pub min_latency_secs: f64,

    /// Upper bound of simulated call latency in seconds (0 disables latency)
    pub max_latency_secs: f64,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            failure_rate: 0.0,
            min_latency_secs: 0.0,
            max_latency_secs: 0.0,
        }
    }
}

impl CrmConfig {
    /// Set the random failure rate
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    /// Set the simulated latency range in seconds
    pub fn with_latency(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.min_latency_secs = min_secs;
        self.max_latency_secs = max_secs;
        self
    }

    /// Failure rate clamped to [0, 1]
    pub fn clamped_failure_rate(&self) -> f64 {
        self.failure_rate.clamp(0.0, 1.0)
    }

    /// Latency bounds after clamping, or `None` when latency is disabled
    ///
    /// The minimum is clamped to be non-negative and the maximum to be at
    /// least the minimum. Latency is only simulated when the maximum is positive.
    pub fn latency_bounds(&self) -> Option<(Duration, Duration)> {
        let min = self.min_latency_secs.max(0.0);
        let max = self.max_latency_secs.max(min);
        if max > 0.0 {
            Some((Duration::from_secs_f64(min), Duration::from_secs_f64(max)))
        } else {
            None
        }
    }

    /// Reject values that cannot be clamped into a usable range
    pub fn validate(&self) -> Result<()> {
        if !self.failure_rate.is_finite() {
            return Err(Error::configuration(format!(
                "CRM failure rate must be a finite number, got {}",
                self.failure_rate
            )));
        }
        for (label, value) in [
            ("minimum", self.min_latency_secs),
            ("maximum", self.max_latency_secs),
        ] {
            if !value.is_finite() {
                return Err(Error::configuration(format!(
                    "CRM {} latency must be a finite number of seconds, got {}",
                    label, value
                )));
            }
        }
        if self.max_latency_secs.max(self.min_latency_secs.max(0.0)) > u32::MAX as f64 {
            return Err(Error::configuration(format!(
                "CRM latency bounds [{}, {}] exceed the supported range",
                self.min_latency_secs, self.max_latency_secs
            )));
        }
        Ok(())
    }
}

/// Welcome notification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Subject line of the welcome email
    pub subject: String,

    /// Greeting name used when a lead has no Name
    pub fallback_name: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            subject: notification::DEFAULT_SUBJECT.to_string(),
            fallback_name: notification::DEFAULT_FALLBACK_NAME.to_string(),
        }
    }
}

/// Random source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Fixed seed for reproducible runs; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

/// Input and output locations for a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Raw lead sheet (.csv or .parquet)
    pub input_path: PathBuf,

    /// Where the cleaned lead sheet is written (.csv or .parquet)
    pub cleaned_output_path: PathBuf,

    /// JSON summary report
    pub report_path: PathBuf,

    /// Also write an HTML dashboard next to the JSON report
    pub html_report: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            cleaned_output_path: PathBuf::from(DEFAULT_CLEANED_OUTPUT_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            html_report: true,
        }
    }
}

/// Global configuration for a lead pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crm: CrmConfig,
    pub notification: NotificationConfig,
    pub random: RandomConfig,
    pub io: IoConfig,
}

impl Config {
    /// Default config file location (`<config dir>/lead-pipeline/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::configuration("Could not determine user configuration directory")
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        let config: Config = toml::from_str(&contents)?;
        debug!("Loaded config file {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Defaults, then the optional config file, then environment overrides
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env::FAILURE_RATE) {
            self.crm.failure_rate = parse_override(env::FAILURE_RATE, &value)?;
        }
        if let Some(value) = lookup(env::MIN_LATENCY) {
            self.crm.min_latency_secs = parse_override(env::MIN_LATENCY, &value)?;
        }
        if let Some(value) = lookup(env::MAX_LATENCY) {
            self.crm.max_latency_secs = parse_override(env::MAX_LATENCY, &value)?;
        }
        if let Some(value) = lookup(env::SEED) {
            self.random.seed = Some(parse_override(env::SEED, &value)?);
        }
        Ok(())
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.crm.validate()?;
        if self.notification.subject.trim().is_empty() {
            return Err(Error::configuration("Notification subject must not be empty"));
        }
        if self.io.input_path.as_os_str().is_empty() {
            return Err(Error::configuration("Input path must not be empty"));
        }
        Ok(())
    }

    /// Path of the HTML dashboard written next to the JSON report
    pub fn html_report_path(&self) -> PathBuf {
        self.io.report_path.with_extension("html")
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::configuration(format!("Invalid value '{}' for {}", value, key))
    })
}
