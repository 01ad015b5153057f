//! Container format handlers for comic archives.

mod rar;
mod zip;

pub use rar::CbrArchive;
pub use zip::CbzArchive;

use std::path::Path;

use crate::Result;
use crate::guard::ExtractRoot;

/// File extension of the normalized output container.
pub const CBZ_EXTENSION: &str = "cbz";

/// Declared container family of a candidate archive.
///
/// Detection is by extension only; content that contradicts its extension is
/// handled by the extraction fallback, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Zip container (`.cbz`), already the normalized family.
    Cbz,
    /// Legacy compressed container. Anything that is not declared `.cbz` is
    /// treated as RAR first and may fall back to zip.
    Cbr,
}

impl ArchiveKind {
    /// Detects the declared kind from a file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let is_cbz = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(CBZ_EXTENSION));
        if is_cbz { Self::Cbz } else { Self::Cbr }
    }
}

/// Trait for container format handlers.
pub trait ArchiveFormat {
    /// Checks archive integrity without extracting or writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the archive is not readable.
    fn validate(&self) -> Result<()>;

    /// Extracts every entry into the guarded root.
    ///
    /// # Errors
    ///
    /// Returns an error on the first entry that cannot be read, written, or
    /// proven to stay inside the root; the scratch directory is left in a
    /// partial state and must be discarded by the caller.
    fn extract(&self, root: &ExtractRoot) -> Result<()>;

    /// Returns the format name for diagnostics.
    fn format_name(&self) -> &str;
}
