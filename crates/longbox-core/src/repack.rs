//! Repacks an extracted scratch tree into a stored (uncompressed) CBZ.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::Write;
use std::path::Component;
use std::path::Path;

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ConvertError;
use crate::Result;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Packs every file under `scratch` into a stored zip at `dest`.
///
/// Entry names are the paths relative to `scratch` with `/` separators, in
/// sorted walk order, so repacking the same tree twice yields the same entry
/// list. Directories are implied by the entry names and not written as
/// entries of their own. An empty scratch tree produces a valid empty
/// archive.
///
/// # Errors
///
/// Returns an error when the scratch tree cannot be walked or read, when the
/// destination cannot be created, or when the zip structure cannot be
/// written.
pub fn repack_dir(scratch: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(dest)?;
    let mut writer = ZipWriter::new(std::io::BufWriter::with_capacity(WRITE_BUFFER_SIZE, file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for entry in WalkDir::new(scratch).sort_by_file_name() {
        let entry = entry.map_err(|e| ConvertError::Repack {
            message: format!("failed to walk scratch tree: {e}"),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(scratch).map_err(|e| {
            ConvertError::Repack {
                message: format!("scratch entry outside scratch root: {e}"),
            }
        })?;

        writer
            .start_file(stored_entry_name(relative), options)
            .map_err(|e| ConvertError::Repack {
                message: format!("failed to start zip entry: {e}"),
            })?;
        let mut source = File::open(entry.path())?;
        std::io::copy(&mut source, &mut writer)?;
    }

    let mut inner = writer.finish().map_err(|e| ConvertError::Repack {
        message: format!("failed to finish zip archive: {e}"),
    })?;
    inner.flush()?;
    Ok(())
}

/// Joins the normal components of a relative path with `/`, the separator
/// recorded in the archive regardless of platform.
fn stored_entry_name(relative: &Path) -> String {
    let mut name = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !name.is_empty() {
                name.push('/');
            }
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}
