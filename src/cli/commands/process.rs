//! Process command: one full batch run
//!
//! Reads the raw lead sheet, writes the cleaned sheet, delivers every lead
//! and writes the JSON report (plus HTML dashboard unless disabled).

use crate::app::adapters::report_writers::{HtmlReportWriter, JsonReportWriter};
use crate::app::adapters::tabular::{open_sink, open_source};
use crate::app::ports::StatsConsumer;
use crate::app::services::delivery::TracingNotificationLog;
use crate::app::services::pipeline::{BatchOptions, PipelineStats, run_batch};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::shared::{load_configuration, setup_logging};

/// Run the process command
pub fn run_process(args: ProcessArgs) -> Result<PipelineStats> {
    let start_time = Instant::now();

    setup_logging(&args);
    info!("Starting lead pipeline");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args).context("Failed to load configuration")?;

    let input = &config.io.input_path;
    let mut source = open_source(input)?;
    let mut sink = open_sink(&config.io.cleaned_output_path)?;

    let mut consumers: Vec<Box<dyn StatsConsumer>> =
        vec![Box::new(JsonReportWriter::new(&config.io.report_path))];
    if config.io.html_report {
        consumers.push(Box::new(HtmlReportWriter::new(config.html_report_path())));
    }

    let options = BatchOptions {
        random: config.random.clone(),
        show_progress: args.show_progress(),
        notification_log: Arc::new(TracingNotificationLog),
    };

    let stats = run_batch(
        source.as_mut(),
        sink.as_mut(),
        &mut consumers,
        &config.crm,
        &config.notification,
        &options,
    )
    .with_context(|| format!("Failed to process leads from {}", input.display()))?;

    generate_final_report(&args, &config, &stats, start_time.elapsed())?;
    Ok(stats)
}

/// Print the end-of-run summary in the requested format
fn generate_final_report(
    args: &ProcessArgs,
    config: &Config,
    stats: &PipelineStats,
    elapsed: Duration,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if !args.quiet {
                generate_human_report(config, stats, elapsed);
            }
            Ok(())
        }
        OutputFormat::Json => generate_json_report(config, stats, elapsed),
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn generate_human_report(config: &Config, stats: &PipelineStats, elapsed: Duration) {
    let cleanup = &stats.cleanup;

    println!("\n{}", "🎉 Pipeline completed successfully".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", "🧹 Cleanup:".bold());
    println!("   • Total raw leads: {}", cleanup.total_raw_leads);
    println!("   • Leads skipped (no email): {}", cleanup.leads_skipped());
    println!("   • Duplicates removed: {}", cleanup.duplicates_removed);
    println!("   • Cleaned leads: {}", cleanup.retained());

    println!("{}", "📇 CRM:".bold());
    println!(
        "   • Stored: {} ({:.1}%)",
        stats.successful_crm_updates,
        percentage(stats.successful_crm_updates, stats.attempted_leads())
    );
    if stats.failed_crm_updates > 0 {
        println!(
            "   • {} {}",
            "Failed:".yellow(),
            stats.failed_crm_updates
        );
    }

    println!("{}", "✉️  Welcome emails:".bold());
    println!(
        "   • Sent: {} ({:.1}%)",
        stats.emails_sent,
        percentage(stats.emails_sent, stats.successful_crm_updates)
    );
    if stats.email_failures > 0 {
        println!("   • {} {}", "Failed:".yellow(), stats.email_failures);
    }

    println!("{}", "📁 Output Files:".bold());
    println!("   • Cleaned leads: {}", config.io.cleaned_output_path.display());
    println!("   • Summary report: {}", config.io.report_path.display());
    if config.io.html_report {
        println!("   • Dashboard: {}", config.html_report_path().display());
    }

    println!("⏱️  Processing time: {}", HumanDuration(elapsed));
    println!("{}", stats.summary());
    println!();
}

/// Print the metric report plus run details as JSON on stdout
fn generate_json_report(config: &Config, stats: &PipelineStats, elapsed: Duration) -> Result<()> {
    let json = serde_json::json!({
        "report": stats.report(),
        "processing_time_seconds": elapsed.as_secs_f64(),
        "cleaned_output": config.io.cleaned_output_path.display().to_string(),
        "report_path": config.io.report_path.display().to_string(),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&json).context("Failed to serialize summary")?
    );
    Ok(())
}
