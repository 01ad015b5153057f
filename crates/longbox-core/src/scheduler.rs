//! Bounded-concurrency batch scheduler.
//!
//! Tasks run on a fixed-size rayon pool; counters are atomics shared by the
//! workers and snapshotted into the returned summary after the join.

use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Instant;

use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator;

use crate::ConvertError;
use crate::Result;
use crate::collect::ConversionTask;
use crate::pipeline;
use crate::pipeline::Converter;
use crate::report::BatchObserver;
use crate::report::BatchSummary;
use crate::report::TaskOutcome;

/// Returns the host's available parallelism, falling back to 1.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Runs every task to a terminal state on a pool of `workers` threads.
///
/// At most `workers` conversions are in flight at any time; a value of 0 is
/// treated as 1. The call returns only after every task has finished, and
/// the summary satisfies `processed == converted + failed`.
///
/// A panic escaping a task is caught, reported as a diagnostic, counted as
/// failed, and the source is best-effort quarantined; the batch continues.
///
/// # Errors
///
/// Returns an error only when the worker pool itself cannot be built. Task
/// failures are counted, never propagated.
pub fn run_batch(
    converter: &Converter,
    tasks: &[ConversionTask],
    workers: usize,
    observer: &dyn BatchObserver,
) -> Result<BatchSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| {
            ConvertError::Io(std::io::Error::other(format!(
                "failed to build worker pool: {e}"
            )))
        })?;

    let processed = AtomicUsize::new(0);
    let converted = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let started = Instant::now();

    pool.install(|| {
        tasks.par_iter().for_each(|task| {
            processed.fetch_add(1, Ordering::Relaxed);
            observer.task_started(&task.source);

            let outcome = match catch_unwind(AssertUnwindSafe(|| converter.convert(task, observer)))
            {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    observer.diagnostic(&format!(
                        "{}: worker panicked: {message}",
                        task.source.display()
                    ));
                    pipeline::quarantine(task, observer);
                    TaskOutcome::Quarantined {
                        reason: ConvertError::TaskPanicked { message },
                    }
                }
            };

            match outcome {
                TaskOutcome::Converted => converted.fetch_add(1, Ordering::Relaxed),
                TaskOutcome::Quarantined { .. } => failed.fetch_add(1, Ordering::Relaxed),
            };
            observer.task_done(&task.source, &outcome);
        });
    });

    Ok(BatchSummary {
        processed: processed.load(Ordering::Relaxed),
        converted: converted.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        duration: started.elapsed(),
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload.downcast_ref::<&str>().map_or_else(
        || {
            payload
                .downcast_ref::<String>()
                .cloned()
                .unwrap_or_else(|| "unknown panic".to_owned())
        },
        |s| (*s).to_owned(),
    )
}
