//! Batch summary output in human-readable and JSON form.

use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::Term;
use console::style;
use longbox_core::BatchSummary;
use serde::Serialize;

/// Formats the end-of-run summary.
pub trait OutputFormatter {
    /// Prints the batch summary exactly once, on stdout.
    fn format_summary(&self, summary: &BatchSummary, quarantine_dir: &Path) -> Result<()>;
}

/// Creates an output formatter based on CLI flags.
pub fn create_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter::new())
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<T> {
    operation: String,
    status: Status,
    data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Warning,
}

struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &BatchSummary, quarantine_dir: &Path) -> Result<()> {
        #[derive(Serialize)]
        struct SummaryData {
            processed: usize,
            converted: usize,
            failed: usize,
            duration_ms: u128,
            quarantine_dir: String,
        }

        let output = JsonOutput {
            operation: "convert".to_owned(),
            status: if summary.is_clean() {
                Status::Success
            } else {
                Status::Warning
            },
            data: SummaryData {
                processed: summary.processed,
                converted: summary.converted,
                failed: summary.failed,
                duration_ms: summary.duration.as_millis(),
                quarantine_dir: quarantine_dir.display().to_string(),
            },
        };

        let json = serde_json::to_string_pretty(&output)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

struct HumanFormatter {
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    fn new() -> Self {
        Self {
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 3600 {
            format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
        } else if secs >= 60 {
            format!("{}m{}s", secs / 60, secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_summary(&self, summary: &BatchSummary, quarantine_dir: &Path) -> Result<()> {
        if summary.is_clean() {
            if self.use_colors {
                let _ = self.term.write_line(&format!(
                    "{} Conversion complete",
                    style("✓").green().bold()
                ));
            } else {
                let _ = self.term.write_line("Conversion complete");
            }
        } else if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Conversion finished with failures",
                style("⚠").yellow().bold()
            ));
        } else {
            let _ = self.term.write_line("Conversion finished with failures");
        }

        let _ = self
            .term
            .write_line(&format!("  Processed: {}", summary.processed));
        let _ = self
            .term
            .write_line(&format!("  Converted: {}", summary.converted));
        let _ = self
            .term
            .write_line(&format!("  Failed:    {}", summary.failed));
        if summary.failed > 0 {
            let _ = self.term.write_line(&format!(
                "  Failed archives preserved under {}",
                quarantine_dir.display()
            ));
        }
        let _ = self.term.write_line(&format!(
            "  Elapsed:   {}",
            Self::format_duration(summary.duration)
        ));

        Ok(())
    }
}
