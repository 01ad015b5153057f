//! Terminal progress reporting for a running batch.
//!
//! Two observers implement the core crate's [`BatchObserver`]: a progress
//! bar for attended terminals and plain stderr lines otherwise. Both keep
//! per-file failure lines visible; quiet mode drops everything else.

use std::path::Path;

use console::Term;
use console::style;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use longbox_core::BatchObserver;
use longbox_core::TaskOutcome;

/// Terminal-facing batch observer with a cleanup hook for the final draw.
pub trait CliObserver: BatchObserver {
    /// Clears any transient rendering before the summary prints.
    fn finish(&self);
}

/// Creates the observer for this run: a progress bar when stderr is an
/// attended terminal, plain diagnostic lines otherwise.
pub fn create_observer(total: usize, quiet: bool) -> Box<dyn CliObserver> {
    if !quiet && Term::stderr().is_term() {
        Box::new(BarObserver::new(total))
    } else {
        Box::new(PlainObserver::new(quiet))
    }
}

/// Progress bar observer for attended terminals.
///
/// Failure lines and diagnostics print above the bar so they survive the
/// final clear.
struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("Converting [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Self { bar }
    }
}

impl BatchObserver for BarObserver {
    fn task_done(&self, source: &Path, outcome: &TaskOutcome) {
        if let TaskOutcome::Quarantined { reason } = outcome {
            self.bar.println(format!(
                "{} {}: {reason}",
                style("FAILED").red().bold(),
                source.display()
            ));
        }
        self.bar.inc(1);
    }

    fn diagnostic(&self, message: &str) {
        self.bar
            .println(format!("{} {message}", style("warning:").yellow().bold()));
    }
}

impl CliObserver for BarObserver {
    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Line-per-event observer for pipes, logs, and quiet mode.
struct PlainObserver {
    term: Term,
    quiet: bool,
}

impl PlainObserver {
    fn new(quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            quiet,
        }
    }
}

impl BatchObserver for PlainObserver {
    fn task_done(&self, source: &Path, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Converted => {
                if !self.quiet {
                    let _ = self
                        .term
                        .write_line(&format!("converted {}", source.display()));
                }
            }
            // Failure lines print even in quiet mode.
            TaskOutcome::Quarantined { reason } => {
                let _ = self
                    .term
                    .write_line(&format!("FAILED {}: {reason}", source.display()));
            }
        }
    }

    fn diagnostic(&self, message: &str) {
        if !self.quiet {
            let _ = self.term.write_line(&format!("warning: {message}"));
        }
    }
}

impl CliObserver for PlainObserver {
    fn finish(&self) {}
}
