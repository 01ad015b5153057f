//! Bulk comic-archive conversion library.
//!
//! `longbox-core` converts trees of comic-book archives (CBR, CBZ) into
//! normalized, uncompressed CBZ files. Archives are treated as untrusted
//! input: every in-process entry write passes a path-traversal guard, and a
//! corrupt or hostile archive is quarantined without aborting the batch.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use longbox_core::Converter;
//! use longbox_core::NoopObserver;
//! use longbox_core::SevenZip;
//!
//! # fn main() -> Result<(), longbox_core::ConvertError> {
//! let tasks = longbox_core::collect_tasks(Path::new("comics"), Path::new("out"))?;
//! let converter = Converter::new(SevenZip::resolve());
//! let workers = longbox_core::default_workers();
//! let summary = longbox_core::run_batch(&converter, &tasks, workers, &NoopObserver)?;
//! println!("converted {} of {}", summary.converted, summary.processed);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod collect;
pub mod error;
pub mod formats;
pub mod guard;
pub mod pipeline;
pub mod repack;
pub mod report;
pub mod scheduler;
pub mod sevenzip;
pub mod test_utils;

// Re-export main API types
pub use collect::ConversionTask;
pub use collect::QUARANTINE_DIR;
pub use collect::collect_tasks;
pub use error::ConvertError;
pub use error::Result;
pub use pipeline::Converter;
pub use report::BatchObserver;
pub use report::BatchSummary;
pub use report::NoopObserver;
pub use report::TaskOutcome;
pub use scheduler::default_workers;
pub use scheduler::run_batch;
pub use sevenzip::SEVEN_ZIP_ENV;
pub use sevenzip::SevenZip;

// Re-export format handling for callers that drive extraction directly
pub use formats::ArchiveFormat;
pub use formats::ArchiveKind;
pub use formats::CbrArchive;
pub use formats::CbzArchive;
pub use guard::ExtractRoot;
pub use repack::repack_dir;
