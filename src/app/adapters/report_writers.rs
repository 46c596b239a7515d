//! Stats consumers that persist the batch report
//!
//! - [`JsonReportWriter`] writes the ordered metric mapping as pretty JSON
//! - [`HtmlReportWriter`] renders a small bar-chart dashboard of the same numbers

use crate::app::ports::StatsConsumer;
use crate::app::services::reporting::StatsReport;
use crate::{Error, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

fn write_report_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io(
                format!("Failed to create report directory {}", parent.display()),
                e,
            )
        })?;
    }
    fs::write(path, contents)
        .map_err(|e| Error::io(format!("Failed to write report {}", path.display()), e))
}

/// Writes the report as a JSON object with keys in report order
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsConsumer for JsonReportWriter {
    fn consume(&mut self, report: &StatsReport) -> Result<()> {
        let json = report.to_json_pretty()?;
        write_report_file(&self.path, &json)?;
        info!("Report saved to {}", self.path.display());
        Ok(())
    }
}

/// Writes a standalone HTML dashboard with one bar per metric
#[derive(Debug, Clone)]
pub struct HtmlReportWriter {
    path: PathBuf,
    title: String,
}

impl HtmlReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: "Lead Processing Report".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the dashboard; bar widths are relative to the largest metric
    pub fn render(&self, report: &StatsReport) -> String {
        let max = report.max_value();
        let mut rows = String::new();

        for (key, value) in report.iter() {
            let width = if max == 0 {
                0.0
            } else {
                value as f64 / max as f64 * 100.0
            };
            // Writing into a String cannot fail
            let _ = writeln!(
                rows,
                "      <tr><td>{}</td><td>{}</td><td><div class=\"bar\" style=\"width: {:.1}%\"></div></td></tr>",
                escape_html(&metric_label(key)),
                value,
                width
            );
        }

        format!(
            "<!DOCTYPE html>
<html lang=\"en\">
<head>
  <meta charset=\"utf-8\">
  <title>{title}</title>
  <style>
    body {{ font-family: sans-serif; margin: 2em; }}
    table {{ border-collapse: collapse; width: 100%; max-width: 48em; }}
    td {{ padding: 0.3em 0.6em; border-bottom: 1px solid #ddd; }}
    td:last-child {{ width: 50%; }}
    .bar {{ background: #4a7bd0; height: 1em; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <table>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
",
            title = escape_html(&self.title),
            rows = rows
        )
    }
}

impl StatsConsumer for HtmlReportWriter {
    fn consume(&mut self, report: &StatsReport) -> Result<()> {
        let html = self.render(report);
        write_report_file(&self.path, &html)?;
        info!("Dashboard saved to {}", self.path.display());
        Ok(())
    }
}

/// `final_processed_leads` -> `Final processed leads`
fn metric_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::cleanup::CleanupStats;
    use crate::app::services::pipeline::PipelineStats;
    use tempfile::TempDir;

    fn sample_report() -> StatsReport {
        PipelineStats {
            cleanup: CleanupStats {
                total_raw_leads: 4,
                ..Default::default()
            },
            successful_crm_updates: 2,
            failed_crm_updates: 2,
            emails_sent: 1,
            email_failures: 1,
        }
        .report()
    }

    #[test]
    fn test_json_writer_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("report.json");

        JsonReportWriter::new(&path).consume(&sample_report()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["total_raw_leads"], 4);
        assert_eq!(value["email_failures"], 1);

        let first = contents.find("total_raw_leads").unwrap();
        let last = contents.find("email_failures").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_html_render_scales_bars() {
        let html = HtmlReportWriter::new("report.html").render(&sample_report());

        assert!(html.contains("<td>Total raw leads</td><td>4</td>"));
        assert!(html.contains("width: 100.0%"));
        assert!(html.contains("width: 25.0%"));
        assert!(html.contains("<title>Lead Processing Report</title>"));
    }

    #[test]
    fn test_html_render_empty_report() {
        let html = HtmlReportWriter::new("report.html").render(&PipelineStats::default().report());
        assert!(html.contains("width: 0.0%"));
        assert!(!html.contains("NaN"));
    }

    #[test]
    fn test_html_writer_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.html");

        HtmlReportWriter::new(&path)
            .with_title("Daily <Leads>")
            .consume(&sample_report())
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Daily &lt;Leads&gt;"));
    }

    #[test]
    fn test_metric_label() {
        assert_eq!(metric_label("emails_sent"), "Emails sent");
        assert_eq!(metric_label(""), "");
    }
}
