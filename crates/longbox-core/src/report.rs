//! Batch conversion reporting.

use std::path::Path;
use std::time::Duration;

use crate::ConvertError;

/// Report of a batch conversion run.
///
/// Every scheduled archive is counted exactly once in `processed` and ends
/// up in exactly one of `converted` or `failed`, so
/// `processed == converted + failed` always holds for a finished batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Number of archives that reached a terminal state.
    pub processed: usize,

    /// Number of archives converted to a normalized copy.
    pub converted: usize,

    /// Number of archives that failed and were quarantined.
    pub failed: usize,

    /// Wall-clock duration of the batch.
    pub duration: Duration,
}

impl BatchSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether every processed archive converted cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Terminal state of one conversion task.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The normalized copy was written to its destination.
    Converted,
    /// The archive failed and a byte-identical copy was placed in the
    /// quarantine directory.
    Quarantined {
        /// Why the conversion failed.
        reason: ConvertError,
    },
}

impl TaskOutcome {
    /// Returns whether the task produced a normalized copy.
    #[must_use]
    pub const fn is_converted(&self) -> bool {
        matches!(self, Self::Converted)
    }
}

/// Callback trait for observing a running batch.
///
/// One observer is shared by every worker thread, so implementations take
/// `&self` and must be `Send + Sync`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use std::sync::atomic::AtomicUsize;
/// use std::sync::atomic::Ordering;
///
/// use longbox_core::BatchObserver;
/// use longbox_core::TaskOutcome;
///
/// #[derive(Default)]
/// struct Counting {
///     done: AtomicUsize,
/// }
///
/// impl BatchObserver for Counting {
///     fn task_done(&self, _source: &Path, _outcome: &TaskOutcome) {
///         self.done.fetch_add(1, Ordering::Relaxed);
///     }
///
///     fn diagnostic(&self, _message: &str) {}
/// }
/// ```
pub trait BatchObserver: Send + Sync {
    /// Called once per archive when its task starts executing, before any
    /// conversion work. Paired with exactly one [`Self::task_done`] call.
    fn task_started(&self, _source: &Path) {}

    /// Called once per archive when its task reaches a terminal state.
    fn task_done(&self, source: &Path, outcome: &TaskOutcome);

    /// Called for non-fatal conditions worth surfacing, such as a fallback
    /// attempt on a mislabeled archive or a failed quarantine copy.
    fn diagnostic(&self, message: &str);
}

/// No-op implementation of [`BatchObserver`].
#[derive(Debug, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {
    fn task_done(&self, _source: &Path, _outcome: &TaskOutcome) {}

    fn diagnostic(&self, _message: &str) {}
}
