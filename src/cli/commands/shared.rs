//! Shared components for CLI commands
//!
//! Logging setup and the layered configuration load used by `process`.

use crate::Result;
use crate::cli::args::ProcessArgs;
use crate::config::Config;
use std::path::Path;
use tracing::{debug, info};

/// Set up structured logging for the process command
///
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn setup_logging(args: &ProcessArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lead_pipeline={}", log_level)));

    // try_init: a subscriber may already be installed when embedded
    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(args: &ProcessArgs) -> Result<Config> {
    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file: Option<&Path> = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_deref()
            .filter(|path| path.exists()),
    };

    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    let mut config = Config::load_layered(config_file)?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;

    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(path) = &args.input_path {
        config.io.input_path = path.clone();
    }
    if let Some(path) = &args.cleaned_output_path {
        config.io.cleaned_output_path = path.clone();
    }
    if let Some(path) = &args.report_path {
        config.io.report_path = path.clone();
    }
    if args.no_html {
        config.io.html_report = false;
    }

    if let Some(rate) = args.failure_rate {
        config.crm.failure_rate = rate;
    }
    if let Some(min) = args.min_latency {
        config.crm.min_latency_secs = min;
    }
    if let Some(max) = args.max_latency {
        config.crm.max_latency_secs = max;
    }
    if let Some(seed) = args.seed {
        config.random.seed = Some(seed);
    }
}
