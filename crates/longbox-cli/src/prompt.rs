//! Interactive directory prompting for attended runs.
//!
//! When a directory argument is missing and stdin is attended, the user is
//! asked for it. Unattended runs treat a missing directory as a usage error
//! instead of hanging on a read.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use console::Term;

/// Fills in missing directories, prompting when stdin is a TTY.
pub fn resolve_directories(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf)> {
    if let (Some(input), Some(output)) = (&input, &output) {
        return Ok((input.clone(), output.clone()));
    }

    // Attended-ness is a property of stdin: a piped stdin cannot answer a
    // prompt even when stdout is still a terminal.
    if !std::io::stdin().is_terminal() {
        bail!("INPUT_DIR and OUTPUT_DIR are required when not running in a terminal");
    }
    let term = Term::stdout();

    let input = match input {
        Some(dir) => dir,
        None => ask(&term, "Input folder: ")?,
    };
    let output = match output {
        Some(dir) => dir,
        None => ask(&term, "Output folder: ")?,
    };
    Ok((input, output))
}

fn ask(term: &Term, question: &str) -> Result<PathBuf> {
    term.write_str(question)
        .context("failed to write to the terminal")?;
    let answer = term
        .read_line()
        .context("failed to read from the terminal")?;
    let answer = answer.trim();
    if answer.is_empty() {
        bail!("no directory given");
    }
    Ok(PathBuf::from(answer))
}
