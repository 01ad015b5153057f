//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "longbox")]
#[command(author, version)]
#[command(about = "Bulk comic-archive converter: CBR/CBZ trees to stored CBZ")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory tree holding the source archives
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory that receives the converted tree
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of concurrent conversions (default: host core count)
    #[arg(
        short = 't',
        long = "threads",
        value_name = "N",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub threads: Option<usize>,

    /// Print the batch summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress the progress bar and informational lines
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_directories() {
        let cli = Cli::try_parse_from(["longbox", "comics", "out"]).unwrap();
        assert_eq!(cli.input_dir, Some(PathBuf::from("comics")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.threads, None);
        assert!(!cli.json);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_directories_are_optional() {
        let cli = Cli::try_parse_from(["longbox"]).unwrap();
        assert_eq!(cli.input_dir, None);
        assert_eq!(cli.output_dir, None);
    }

    #[test]
    fn test_threads_override() {
        let cli = Cli::try_parse_from(["longbox", "-t", "4", "comics", "out"]).unwrap();
        assert_eq!(cli.threads, Some(4));

        let cli = Cli::try_parse_from(["longbox", "--threads", "1", "comics", "out"]).unwrap();
        assert_eq!(cli.threads, Some(1));
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        assert!(Cli::try_parse_from(["longbox", "-t", "0", "comics", "out"]).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["longbox", "--json", "-q", "comics", "out"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
    }
}
