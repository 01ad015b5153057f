//! Discovers candidate archives and plans their conversion tasks.

use std::collections::HashMap;
use std::fs::create_dir_all;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::ConvertError;
use crate::Result;
use crate::formats::CBZ_EXTENSION;

/// Directory under the output root that receives byte-identical copies of
/// archives that failed to convert.
pub const QUARANTINE_DIR: &str = "_failed";

/// One planned archive conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    /// The archive found under the input root.
    pub source: PathBuf,

    /// Destination of the normalized copy. Mirrors the source's relative
    /// location with the extension replaced by `.cbz`.
    pub dest: PathBuf,

    /// Where a byte-identical copy lands if the conversion fails. Keeps the
    /// original file name, under the quarantine directory.
    pub quarantine: PathBuf,
}

/// Walks the input tree and plans one task per regular file.
///
/// Destination parents are created eagerly so the output mirrors the input
/// directory layout before any worker runs. Files are visited in sorted
/// order, so the returned plan is deterministic for a given tree. Symlinks
/// are not followed.
///
/// # Errors
///
/// Returns [`ConvertError::SourceNotFound`] when `input_root` is not an
/// existing directory, [`ConvertError::DestinationCollision`] when two
/// sources map to the same destination (such as `a.cbr` next to `a.cbz`),
/// and I/O errors when the tree cannot be walked or the output layout
/// cannot be created.
pub fn collect_tasks(input_root: &Path, output_root: &Path) -> Result<Vec<ConversionTask>> {
    if !input_root.is_dir() {
        return Err(ConvertError::SourceNotFound {
            path: input_root.to_path_buf(),
        });
    }
    create_dir_all(output_root)?;

    let mut tasks = Vec::new();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for entry in WalkDir::new(input_root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ConvertError::Io(std::io::Error::other(format!(
                "failed to walk input tree: {e}"
            )))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let source = entry.path().to_path_buf();
        let relative = source.strip_prefix(input_root).map_err(|e| {
            ConvertError::Io(std::io::Error::other(format!(
                "input entry outside input root: {e}"
            )))
        })?
        .to_path_buf();
        let dest = output_root.join(&relative).with_extension(CBZ_EXTENSION);

        if let Some(first) = claimed.get(&dest) {
            return Err(ConvertError::DestinationCollision {
                dest,
                first: first.clone(),
                second: source,
            });
        }

        if let Some(parent) = dest.parent() {
            create_dir_all(parent)?;
        }

        claimed.insert(dest.clone(), source.clone());
        tasks.push(ConversionTask {
            source,
            dest,
            quarantine: output_root.join(QUARANTINE_DIR).join(relative),
        });
    }

    Ok(tasks)
}
