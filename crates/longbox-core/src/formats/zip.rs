//! Zip-container (CBZ) validation and extraction.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use crate::ConvertError;
use crate::Result;
use crate::formats::ArchiveFormat;
use crate::guard::ExtractRoot;

/// A comic archive in a zip container.
pub struct CbzArchive<'a> {
    path: &'a Path,
}

impl<'a> CbzArchive<'a> {
    /// Wraps a path as a zip-container archive.
    #[must_use]
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    fn open(&self) -> Result<zip::ZipArchive<BufReader<File>>> {
        let file = File::open(self.path)?;
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| {
            ConvertError::InvalidArchive(format!("failed to read zip central directory: {e}"))
        })
    }
}

impl ArchiveFormat for CbzArchive<'_> {
    /// Parses the central directory; any parse failure means invalid.
    fn validate(&self) -> Result<()> {
        self.open()?;
        Ok(())
    }

    /// Streams every entry into the root, one guarded write per entry.
    ///
    /// Symlink entries are written as regular files holding the recorded
    /// target bytes; nothing outside the root is ever created.
    fn extract(&self, root: &ExtractRoot) -> Result<()> {
        let mut archive = self.open()?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| {
                ConvertError::InvalidArchive(format!("failed to read zip entry {index}: {e}"))
            })?;

            let recorded_name = entry.name().to_owned();
            let Some(target) = root.resolve(&recorded_name)? else {
                continue;
            };

            if entry.is_dir() {
                create_dir_all(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                create_dir_all(parent)?;
            }

            let output = File::create(&target)?;
            let mut writer = BufWriter::with_capacity(64 * 1024, output);
            std::io::copy(&mut entry, &mut writer)?;
            writer.flush()?;
        }

        Ok(())
    }

    fn format_name(&self) -> &str {
        "cbz"
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::CbzBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_validate_accepts_well_formed_archive() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("comic.cbz");
        CbzBuilder::new()
            .file("page1.jpg", b"jpeg bytes")
            .write_to(&path)
            .expect("failed to write fixture");

        assert!(CbzArchive::new(&path).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("broken.cbz");
        std::fs::write(&path, b"this is not a zip container").unwrap();

        let result = CbzArchive::new(&path).validate();
        assert!(matches!(result, Err(ConvertError::InvalidArchive(_))));
    }

    #[test]
    fn test_validate_accepts_empty_archive() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("empty.cbz");
        CbzBuilder::new().write_to(&path).expect("failed to write fixture");

        assert!(CbzArchive::new(&path).validate().is_ok());
    }

    #[test]
    fn test_extract_writes_entries() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("comic.cbz");
        CbzBuilder::new()
            .file("page1.jpg", b"front")
            .file("chapter 2/page2.jpg", b"back")
            .write_to(&path)
            .expect("failed to write fixture");

        let scratch = TempDir::new().expect("failed to create scratch");
        let root = ExtractRoot::new(scratch.path()).expect("failed to create root");

        CbzArchive::new(&path).extract(&root).expect("extract should succeed");

        assert_eq!(
            std::fs::read(scratch.path().join("page1.jpg")).unwrap(),
            b"front"
        );
        assert_eq!(
            std::fs::read(scratch.path().join("chapter 2/page2.jpg")).unwrap(),
            b"back"
        );
    }

    #[test]
    fn test_extract_normalizes_backslash_names() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("windows.cbz");
        CbzBuilder::new()
            .file("pages\\001.jpg", b"data")
            .write_to(&path)
            .expect("failed to write fixture");

        let scratch = TempDir::new().expect("failed to create scratch");
        let root = ExtractRoot::new(scratch.path()).expect("failed to create root");

        CbzArchive::new(&path).extract(&root).expect("extract should succeed");

        assert!(scratch.path().join("pages/001.jpg").is_file());
    }

    #[test]
    fn test_extract_aborts_on_traversal_entry() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("hostile.cbz");
        CbzBuilder::new()
            .file("../escape.txt", b"gotcha")
            .write_to(&path)
            .expect("failed to write fixture");

        let outer = TempDir::new().expect("failed to create outer dir");
        let scratch = outer.path().join("scratch");
        std::fs::create_dir(&scratch).unwrap();
        let root = ExtractRoot::new(&scratch).expect("failed to create root");

        let result = CbzArchive::new(&path).extract(&root);
        assert!(matches!(result, Err(ConvertError::PathTraversal { .. })));
        assert!(
            !outer.path().join("escape.txt").exists(),
            "traversal entry must not be written outside the root"
        );
    }

    #[test]
    fn test_extract_directory_entries() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = temp.path().join("dirs.cbz");
        CbzBuilder::new()
            .dir("chapter 1/")
            .file("chapter 1/page.jpg", b"x")
            .write_to(&path)
            .expect("failed to write fixture");

        let scratch = TempDir::new().expect("failed to create scratch");
        let root = ExtractRoot::new(scratch.path()).expect("failed to create root");

        CbzArchive::new(&path).extract(&root).expect("extract should succeed");

        assert!(scratch.path().join("chapter 1").is_dir());
        assert!(scratch.path().join("chapter 1/page.jpg").is_file());
    }
}
