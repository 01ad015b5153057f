//! Entry-name normalization and the extraction containment guard.
//!
//! Archive entry names are attacker-controlled. Every in-process entry write
//! resolves its recorded name through [`ExtractRoot::resolve`] first; a name
//! that cannot be proven to land inside the scratch directory aborts the
//! extraction of that archive.

use crate::ConvertError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A canonicalized extraction root that resolves untrusted entry names.
///
/// # Security Properties
///
/// - The root is resolved to absolute, canonical form at construction, so
///   later containment checks compare against a stable path.
/// - Resolution strips leading separators and converts backslashes, then
///   rejects `..` components, Windows drive prefixes, and NUL bytes before
///   any path is built.
/// - The final containment check is component-wise (`Path::starts_with`),
///   never a raw string prefix, so a sibling directory such as `root-evil`
///   can never pass for `root`.
///
/// # Examples
///
/// ```no_run
/// use longbox_core::guard::ExtractRoot;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = ExtractRoot::new(Path::new("/tmp/scratch"))?;
///
/// // Backslashes and leading separators are normalized away.
/// let target = root.resolve("pages\\001.jpg")?;
/// assert!(target.is_some());
///
/// // Parent-directory components abort the extraction.
/// assert!(root.resolve("../escape.txt").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExtractRoot {
    root: PathBuf,
}

impl ExtractRoot {
    /// Canonicalizes `path` and wraps it as an extraction root.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::Io` when the directory does not exist or
    /// cannot be canonicalized.
    pub fn new(path: &Path) -> Result<Self> {
        let root = path.canonicalize()?;
        Ok(Self { root })
    }

    /// Returns the canonical root directory.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.root
    }

    /// Resolves a recorded entry name to a write target inside the root.
    ///
    /// Returns `Ok(None)` when the name is empty after normalization (such
    /// entries are skipped, matching the behavior of archives that record a
    /// bare `/` entry).
    ///
    /// # Resolution steps
    ///
    /// 1. Reject NUL bytes.
    /// 2. Normalize: backslashes become `/`, leading separators are
    ///    stripped (an absolute recorded name is treated as relative).
    /// 3. Scan components: `.` is dropped, `..` and any surviving root or
    ///    drive prefix are traversal violations.
    /// 4. Join onto the canonical root and require component-wise
    ///    containment.
    ///
    /// # Errors
    ///
    /// - `ConvertError::SecurityViolation` for NUL bytes.
    /// - `ConvertError::PathTraversal` for `..`, drive prefixes, or any
    ///   resolution that escapes the root.
    pub fn resolve(&self, raw_name: &str) -> Result<Option<PathBuf>> {
        if raw_name.contains('\0') {
            return Err(ConvertError::SecurityViolation {
                reason: format!("entry name contains NUL byte: {raw_name:?}"),
            });
        }

        let Some(normalized) = normalize_entry_name(raw_name) else {
            return Ok(None);
        };

        let mut relative = PathBuf::new();
        for component in Path::new(&normalized).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ConvertError::PathTraversal {
                        path: PathBuf::from(raw_name),
                    });
                }
            }
        }

        if relative.as_os_str().is_empty() {
            return Ok(None);
        }

        let target = self.root.join(&relative);
        if !target.starts_with(&self.root) {
            return Err(ConvertError::PathTraversal {
                path: PathBuf::from(raw_name),
            });
        }

        Ok(Some(target))
    }
}

/// Normalizes a recorded entry name: leading separators stripped,
/// backslashes converted to forward slashes.
///
/// Returns `None` when nothing remains.
#[must_use]
pub fn normalize_entry_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim_start_matches(['/', '\\']);
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace('\\', "/"))
}
