//! Error types for comic archive conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ConvertError`.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting comic archives.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted, truncated, or not the container it claims to be.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Archive entry resolved outside the extraction directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The recorded entry path that attempted traversal.
        path: PathBuf,
    },

    /// Archive entry rejected before resolution.
    #[error("entry rejected by security policy: {reason}")]
    SecurityViolation {
        /// Reason for the rejection.
        reason: String,
    },

    /// The external 7-Zip process failed or could not be launched.
    #[error("7-Zip: {message}")]
    Tool {
        /// Trimmed stderr text or exit status description.
        message: String,
    },

    /// Writing the output archive failed.
    #[error("failed to write output archive: {message}")]
    Repack {
        /// Underlying failure description.
        message: String,
    },

    /// Input root does not exist or is not a directory.
    #[error("input directory not found: {path}")]
    SourceNotFound {
        /// The missing input root.
        path: PathBuf,
    },

    /// A worker thread panicked while converting an archive.
    #[error("conversion panicked: {message}")]
    TaskPanicked {
        /// Captured panic payload text.
        message: String,
    },

    /// Two input files map to the same output file.
    #[error(
        "destination collision: {first} and {second} both convert to {dest}"
    )]
    DestinationCollision {
        /// The contested output path.
        dest: PathBuf,
        /// First claimant, in walk order.
        first: PathBuf,
        /// Second claimant.
        second: PathBuf,
    },
}

impl ConvertError {
    /// Returns `true` if this error represents a hostile archive rather than
    /// a broken one.
    ///
    /// # Examples
    ///
    /// ```
    /// use longbox_core::ConvertError;
    /// use std::path::PathBuf;
    ///
    /// let err = ConvertError::PathTraversal {
    ///     path: PathBuf::from("../../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ConvertError::InvalidArchive("truncated".to_string());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::SecurityViolation { .. }
        )
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::SecurityViolation { reason } => Some(reason),
            Self::Tool { message } | Self::Repack { message } | Self::TaskPanicked { message } => {
                Some(message)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvertError::InvalidArchive("bad central directory".into());
        assert_eq!(err.to_string(), "invalid archive: bad central directory");
    }

    #[test]
    fn test_path_traversal_error() {
        let err = ConvertError::PathTraversal {
            path: PathBuf::from("../etc/passwd"),
        };
        assert!(err.to_string().contains("path traversal"));
        assert!(err.to_string().contains("../etc/passwd"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConvertError = io_err.into();
        assert!(matches!(err, ConvertError::Io(_)));
    }

    #[test]
    fn test_is_security_violation() {
        let err = ConvertError::PathTraversal {
            path: PathBuf::from("../escape"),
        };
        assert!(err.is_security_violation());

        let err = ConvertError::SecurityViolation {
            reason: "NUL byte in entry name".into(),
        };
        assert!(err.is_security_violation());

        let err = ConvertError::InvalidArchive("bad".into());
        assert!(!err.is_security_violation());

        let err = ConvertError::Tool {
            message: "exit status 2".into(),
        };
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_context() {
        let err = ConvertError::InvalidArchive("bad header".into());
        assert_eq!(err.context(), Some("bad header"));

        let err = ConvertError::Tool {
            message: "cannot open archive".into(),
        };
        assert_eq!(err.context(), Some("cannot open archive"));

        let err = ConvertError::TaskPanicked {
            message: "index out of bounds".into(),
        };
        assert_eq!(err.context(), Some("index out of bounds"));

        let err = ConvertError::PathTraversal {
            path: PathBuf::from("../x"),
        };
        assert_eq!(err.context(), None);
    }

    #[test]
    fn test_task_panicked_display() {
        let err = ConvertError::TaskPanicked {
            message: "worker panicked".into(),
        };
        assert_eq!(err.to_string(), "conversion panicked: worker panicked");
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_destination_collision_names_everything() {
        let err = ConvertError::DestinationCollision {
            dest: PathBuf::from("out/a.cbz"),
            first: PathBuf::from("in/a.cbr"),
            second: PathBuf::from("in/a.cbz"),
        };
        let display = err.to_string();
        assert!(display.contains("out/a.cbz"));
        assert!(display.contains("in/a.cbr"));
        assert!(display.contains("in/a.cbz"));
    }
}
