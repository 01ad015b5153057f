//! Legacy (RAR) comic archive validation and extraction.
//!
//! Two engines, picked at construction: a resolved external 7-Zip binary,
//! or the in-process `unrar` reader when no binary was found. The external
//! tool extracts entries itself, so containment is delegated to it; the
//! in-process path resolves every entry through the guard before writing.

use std::fs::create_dir_all;
use std::path::Path;

use unrar::Archive;

use crate::ConvertError;
use crate::Result;
use crate::formats::ArchiveFormat;
use crate::guard::ExtractRoot;
use crate::sevenzip::SevenZip;

/// A comic archive in a legacy compressed container.
pub struct CbrArchive<'a> {
    path: &'a Path,
    tool: Option<&'a SevenZip>,
}

impl<'a> CbrArchive<'a> {
    /// Wraps a path as a legacy archive, extracting with `tool` when one
    /// was resolved.
    #[must_use]
    pub fn new(path: &'a Path, tool: Option<&'a SevenZip>) -> Self {
        Self { path, tool }
    }

    fn validate_with_unrar(&self) -> Result<()> {
        let archive = Archive::new(self.path).open_for_listing().map_err(|e| {
            ConvertError::InvalidArchive(format!("failed to open RAR archive: {e}"))
        })?;

        for entry in archive {
            entry.map_err(|e| {
                ConvertError::InvalidArchive(format!("failed to list RAR entry: {e}"))
            })?;
        }
        Ok(())
    }

    fn extract_with_unrar(&self, root: &ExtractRoot) -> Result<()> {
        let mut archive = Archive::new(self.path).open_for_processing().map_err(|e| {
            ConvertError::InvalidArchive(format!("failed to open RAR archive: {e}"))
        })?;

        while let Some(header) = archive.read_header().map_err(|e| {
            ConvertError::InvalidArchive(format!("failed to read RAR header: {e}"))
        })? {
            archive = if header.entry().is_file() {
                let recorded_name = header.entry().filename.to_string_lossy().into_owned();
                // Resolve before reading so hostile names abort without
                // decompressing their payload.
                match root.resolve(&recorded_name)? {
                    Some(target) => {
                        let (data, rest) = header.read().map_err(|e| {
                            ConvertError::InvalidArchive(format!(
                                "failed to read RAR entry {recorded_name}: {e}"
                            ))
                        })?;
                        if let Some(parent) = target.parent() {
                            create_dir_all(parent)?;
                        }
                        std::fs::write(&target, data)?;
                        rest
                    }
                    None => header.skip().map_err(|e| {
                        ConvertError::InvalidArchive(format!("failed to skip RAR entry: {e}"))
                    })?,
                }
            } else {
                header.skip().map_err(|e| {
                    ConvertError::InvalidArchive(format!("failed to skip RAR entry: {e}"))
                })?
            };
        }
        Ok(())
    }
}

impl ArchiveFormat for CbrArchive<'_> {
    /// Test-extracts via the external tool, or lists every header with the
    /// in-process reader.
    fn validate(&self) -> Result<()> {
        match self.tool {
            Some(tool) => tool.test_archive(self.path),
            None => self.validate_with_unrar(),
        }
    }

    fn extract(&self, root: &ExtractRoot) -> Result<()> {
        match self.tool {
            Some(tool) => tool.extract_to(self.path, root.as_path()),
            None => self.extract_with_unrar(root),
        }
    }

    fn format_name(&self) -> &str {
        "cbr"
    }
}
