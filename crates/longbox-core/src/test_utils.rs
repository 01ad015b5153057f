//! Test utilities for building comic-archive fixtures.
//!
//! The builder writes entry names exactly as given, including hostile names
//! (`../`, absolute paths, backslashes) that well-behaved tooling would
//! refuse, so guard behavior can be tested against realistic attacks.
//!
//! # Panics
//!
//! Builder methods panic on I/O errors since they are designed for test use
//! only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Creates an in-memory zip-container archive from a list of entries.
///
/// Each entry is a tuple of (recorded name, content), stored uncompressed.
///
/// # Examples
///
/// ```
/// use longbox_core::test_utils::create_test_cbz;
///
/// let bytes = create_test_cbz(vec![("001.jpg", b"front"), ("ch2/002.jpg", b"back")]);
/// ```
#[must_use]
pub fn create_test_cbz(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let mut builder = CbzBuilder::new();
    for (name, data) in entries {
        builder = builder.file(name, data);
    }
    builder.build()
}

/// Builder for zip-container comic fixtures.
///
/// # Examples
///
/// ```
/// use longbox_core::test_utils::CbzBuilder;
///
/// let bytes = CbzBuilder::new()
///     .file("001.jpg", b"front")
///     .dir("bonus/")
///     .file("bonus/sketch.jpg", b"lines")
///     .build();
/// ```
pub struct CbzBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl CbzBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored (uncompressed) file entry under the exact recorded name.
    #[must_use]
    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.zip.start_file(name, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a deflate-compressed file entry, as found in wild CBZ files.
    #[must_use]
    pub fn deflated_file(mut self, name: &str, data: &[u8]) -> Self {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(name, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn dir(mut self, name: &str) -> Self {
        self.zip
            .add_directory(name, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Builds and returns the archive bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }

    /// Builds the archive and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn write_to(self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}

impl Default for CbzBuilder {
    fn default() -> Self {
        Self::new()
    }
}
