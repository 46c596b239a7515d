//! Application constants for the lead pipeline
//!
//! This module contains canonical field names, column aliases, simulator
//! messages, metric keys and default values used throughout the pipeline.

// =============================================================================
// Canonical Lead Fields
// =============================================================================

/// Canonical lead field names
pub mod fields {
    pub const NAME: &str = "Name";
    pub const EMAIL: &str = "Email";
    pub const PHONE: &str = "Phone";
    pub const SOURCE: &str = "Source";
    pub const CREATED_DATE: &str = "Created Date";

    /// Canonical fields in the order they appear in generated lead sheets
    pub const ALL: &[&str] = &[NAME, EMAIL, PHONE, SOURCE, CREATED_DATE];
}

/// Recognised column labels (lower-cased, trimmed) and the canonical field they map to
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("name", fields::NAME),
    ("email", fields::EMAIL),
    ("e-mail", fields::EMAIL),
    ("phone", fields::PHONE),
    ("phone number", fields::PHONE),
    ("mobile", fields::PHONE),
    ("source", fields::SOURCE),
    ("created date", fields::CREATED_DATE),
    ("created_at", fields::CREATED_DATE),
    ("created", fields::CREATED_DATE),
];

// =============================================================================
// Simulator Rules and Messages
// =============================================================================

/// CRM simulator rule markers and outcome messages
pub mod crm {
    /// Email substring (case-insensitive) that always fails CRM registration
    pub const FAIL_MARKER: &str = "fail";

    pub const FLAGGED_FAILURE: &str = "email flagged as failing test case";
    pub const RANDOM_FAILURE: &str = "random simulated failure";
    pub const STORED: &str = "lead stored in CRM";
}

/// Notification simulator rule markers and outcome messages
pub mod notification {
    /// Email substring (case-insensitive) that always bounces
    pub const BOUNCE_MARKER: &str = "bounce";

    pub const INVALID_ADDRESS: &str = "invalid address";
    pub const BOUNCED: &str = "simulated bounce";
    pub const SENT: &str = "welcome email logged as sent";

    pub const DEFAULT_SUBJECT: &str = "Welcome to our service";
    pub const DEFAULT_FALLBACK_NAME: &str = "there";
}

// =============================================================================
// Report Metric Keys
// =============================================================================

/// Metric keys of the batch report, in report order
pub mod metrics {
    pub const TOTAL_RAW_LEADS: &str = "total_raw_leads";
    pub const LEADS_SKIPPED: &str = "leads_skipped";
    pub const DUPLICATES_REMOVED: &str = "duplicates_removed";
    pub const FINAL_PROCESSED_LEADS: &str = "final_processed_leads";
    pub const SUCCESSFUL_CRM_UPDATES: &str = "successful_crm_updates";
    pub const FAILED_CRM_UPDATES: &str = "failed_crm_updates";
    pub const EMAILS_SENT: &str = "emails_sent";
    pub const EMAIL_FAILURES: &str = "email_failures";

    pub const ORDER: &[&str] = &[
        TOTAL_RAW_LEADS,
        LEADS_SKIPPED,
        DUPLICATES_REMOVED,
        FINAL_PROCESSED_LEADS,
        SUCCESSFUL_CRM_UPDATES,
        FAILED_CRM_UPDATES,
        EMAILS_SENT,
        EMAIL_FAILURES,
    ];
}

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_INPUT_PATH: &str = "leads.csv";
pub const DEFAULT_CLEANED_OUTPUT_PATH: &str = "cleaned_leads.csv";
pub const DEFAULT_REPORT_PATH: &str = "report.json";

/// Directory name under the user config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "lead-pipeline";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overrides
pub mod env {
    pub const FAILURE_RATE: &str = "LEAD_PIPELINE_FAILURE_RATE";
    pub const MIN_LATENCY: &str = "LEAD_PIPELINE_MIN_LATENCY";
    pub const MAX_LATENCY: &str = "LEAD_PIPELINE_MAX_LATENCY";
    pub const SEED: &str = "LEAD_PIPELINE_SEED";
}

/// Progress bar template shared by pipeline stages
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";
