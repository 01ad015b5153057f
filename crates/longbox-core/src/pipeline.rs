//! Per-file conversion pipeline.
//!
//! `convert` drives one archive through screen, extract, repack, and
//! cleanup. Errors never escape: every failure routes the source into
//! quarantine and the task ends in exactly one terminal outcome.

use std::fs::create_dir_all;
use std::path::Path;

use tempfile::TempDir;

use crate::ConvertError;
use crate::Result;
use crate::collect::ConversionTask;
use crate::formats::ArchiveFormat;
use crate::formats::ArchiveKind;
use crate::formats::CbrArchive;
use crate::formats::CbzArchive;
use crate::guard::ExtractRoot;
use crate::repack::repack_dir;
use crate::report::BatchObserver;
use crate::report::TaskOutcome;
use crate::sevenzip::SevenZip;

const SCRATCH_PREFIX: &str = ".longbox-scratch-";

/// Converts archives into normalized stored CBZ files.
///
/// One converter is shared by all workers; it holds the resolved external
/// tool handle, if any.
pub struct Converter {
    tool: Option<SevenZip>,
}

impl Converter {
    /// Creates a converter that extracts legacy archives with `tool` when
    /// present and with the in-process RAR reader otherwise.
    #[must_use]
    pub fn new(tool: Option<SevenZip>) -> Self {
        Self { tool }
    }

    /// Returns the external tool handle in use, if any.
    #[must_use]
    pub fn tool(&self) -> Option<&SevenZip> {
        self.tool.as_ref()
    }

    /// Runs one task to its terminal state.
    ///
    /// On failure the source is copied byte-for-byte to its quarantine path
    /// and any partially written destination is removed, so exactly one of
    /// the normalized copy and the quarantine copy exists afterwards.
    pub fn convert(&self, task: &ConversionTask, observer: &dyn BatchObserver) -> TaskOutcome {
        match self.try_convert(task, observer) {
            Ok(()) => TaskOutcome::Converted,
            Err(reason) => {
                quarantine(task, observer);
                TaskOutcome::Quarantined { reason }
            }
        }
    }

    fn try_convert(&self, task: &ConversionTask, observer: &dyn BatchObserver) -> Result<()> {
        let kind = ArchiveKind::from_path(&task.source);

        // Screen declared CBZs before spending extraction work; anything
        // that cannot even be opened goes straight to quarantine.
        if kind == ArchiveKind::Cbz {
            CbzArchive::new(&task.source).validate()?;
        }

        let dest_parent = task.dest.parent().ok_or_else(|| {
            ConvertError::Io(std::io::Error::other(
                "destination has no parent directory",
            ))
        })?;

        let mut scratch = create_scratch(dest_parent)?;
        let result = self
            .extract_with_fallback(task, kind, &mut scratch, dest_parent, observer)
            .and_then(|()| repack_dir(scratch.path(), &task.dest));
        close_scratch(scratch, observer);
        result
    }

    fn extract_with_fallback(
        &self,
        task: &ConversionTask,
        kind: ArchiveKind,
        scratch: &mut TempDir,
        dest_parent: &Path,
        observer: &dyn BatchObserver,
    ) -> Result<()> {
        let root = ExtractRoot::new(scratch.path())?;
        let primary = match kind {
            ArchiveKind::Cbz => CbzArchive::new(&task.source).extract(&root),
            ArchiveKind::Cbr => CbrArchive::new(&task.source, self.tool.as_ref()).extract(&root),
        };

        let Err(primary_err) = primary else {
            return Ok(());
        };
        if kind == ArchiveKind::Cbz {
            // Declared CBZs get no second chance.
            return Err(primary_err);
        }

        observer.diagnostic(&format!(
            "{}: legacy extraction failed ({primary_err}), retrying as zip",
            task.source.display()
        ));

        let fallback = CbzArchive::new(&task.source);
        fallback.validate()?;

        // The fallback starts from a brand-new scratch; whatever the first
        // attempt left behind is discarded.
        let fresh = create_scratch(dest_parent)?;
        let partial = std::mem::replace(scratch, fresh);
        close_scratch(partial, observer);

        let fresh_root = ExtractRoot::new(scratch.path())?;
        fallback.extract(&fresh_root)
    }
}

/// Copies the source archive to its quarantine path, removing any partial
/// destination first.
///
/// Both steps are best-effort: their failures are reported as diagnostics
/// and never change the task's outcome.
pub(crate) fn quarantine(task: &ConversionTask, observer: &dyn BatchObserver) {
    if task.dest.exists() {
        if let Err(e) = std::fs::remove_file(&task.dest) {
            observer.diagnostic(&format!(
                "{}: failed to remove partial output: {e}",
                task.dest.display()
            ));
        }
    }

    if let Err(e) = copy_to_quarantine(task) {
        observer.diagnostic(&format!(
            "{}: quarantine copy failed: {e}",
            task.source.display()
        ));
    }
}

fn copy_to_quarantine(task: &ConversionTask) -> Result<()> {
    if let Some(parent) = task.quarantine.parent() {
        create_dir_all(parent)?;
    }
    std::fs::copy(&task.source, &task.quarantine)?;
    Ok(())
}

fn create_scratch(parent: &Path) -> Result<TempDir> {
    Ok(tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(parent)?)
}

fn close_scratch(scratch: TempDir, observer: &dyn BatchObserver) {
    if let Err(e) = scratch.close() {
        observer.diagnostic(&format!("failed to remove scratch directory: {e}"));
    }
}
