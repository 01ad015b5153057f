//! longbox - bulk converter for comic-book archive trees.

mod cli;
mod output;
mod progress;
mod prompt;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use longbox_core::Converter;
use longbox_core::QUARANTINE_DIR;
use longbox_core::SevenZip;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    run(cli)
}

/// Runs the whole batch. Setup failures return an error and a nonzero exit;
/// per-file failures are quarantined, counted, and leave the exit code zero.
fn run(cli: cli::Cli) -> Result<()> {
    let (input_dir, output_dir) = prompt::resolve_directories(cli.input_dir, cli.output_dir)?;

    let tool = SevenZip::resolve();
    if !cli.quiet {
        match &tool {
            Some(tool) => eprintln!("Using 7-Zip at {}", tool.path().display()),
            None => eprintln!("7-Zip not found; using the built-in RAR reader"),
        }
    }

    let tasks = longbox_core::collect_tasks(&input_dir, &output_dir)
        .context("failed to plan the conversion batch")?;
    let workers = cli.threads.unwrap_or_else(longbox_core::default_workers);
    let converter = Converter::new(tool);

    let observer = progress::create_observer(tasks.len(), cli.quiet);
    let summary = longbox_core::run_batch(&converter, &tasks, workers, &*observer)
        .context("failed to start the conversion batch")?;
    observer.finish();

    let formatter = output::create_formatter(cli.json);
    formatter.format_summary(&summary, &output_dir.join(QUARANTINE_DIR))
}
