//! External 7-Zip discovery and invocation.
//!
//! The converter prefers a real 7-Zip binary for legacy archives and treats
//! its absence as a soft failure: extraction falls back to the in-process
//! RAR reader. Discovery walks an ordered list of strategies and the first
//! hit wins.

use std::env;
use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;

use crate::ConvertError;
use crate::Result;

/// Environment variable overriding the 7-Zip executable location.
pub const SEVEN_ZIP_ENV: &str = "SEVEN_ZIP_PATH";

/// Conventional install locations probed relative to the running executable.
const INSTALL_CANDIDATES: &[&str] = &["tools/7z/7z", "7z/7z", "7z"];

/// Binary names probed on the host PATH.
const PATH_CANDIDATES: &[&str] = &["7z", "7zz", "7za"];

/// Handle to a resolved 7-Zip executable.
#[derive(Debug, Clone)]
pub struct SevenZip {
    exe: PathBuf,
}

impl SevenZip {
    /// Resolves a 7-Zip executable, first success wins:
    /// environment override, then install locations next to the executable,
    /// then the host PATH.
    ///
    /// Returns `None` when every strategy misses; that is not an error, the
    /// caller switches to the in-process reader.
    #[must_use]
    pub fn resolve() -> Option<Self> {
        const RESOLVERS: &[fn() -> Option<PathBuf>] =
            &[resolve_from_env, resolve_from_install_dirs, resolve_from_path];

        RESOLVERS
            .iter()
            .find_map(|resolve| resolve())
            .map(|exe| Self { exe })
    }

    /// Wraps a known executable path without probing.
    #[must_use]
    pub fn at(exe: PathBuf) -> Self {
        Self { exe }
    }

    /// Returns the resolved executable path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.exe
    }

    /// Runs the tool's test mode (`t <archive>`) and maps a nonzero exit to
    /// an error.
    pub fn test_archive(&self, archive: &Path) -> Result<()> {
        self.run(&[OsStr::new("t"), archive.as_os_str()])
    }

    /// Extracts the whole archive into `dest` (`x -y -o<dest> <archive>`).
    ///
    /// The tool writes entries itself; containment within `dest` is
    /// delegated to it, which is why callers hand it a scratch directory
    /// that is discarded on any failure.
    pub fn extract_to(&self, archive: &Path, dest: &Path) -> Result<()> {
        let mut output_flag = std::ffi::OsString::from("-o");
        output_flag.push(dest.as_os_str());
        self.run(&[
            OsStr::new("x"),
            OsStr::new("-y"),
            &output_flag,
            archive.as_os_str(),
        ])
    }

    /// Invokes the executable, discarding stdout and collecting stderr.
    /// Exit status 0 is success; anything else becomes a `Tool` error
    /// carrying the trimmed stderr text (or the status when stderr is
    /// empty).
    fn run(&self, args: &[&OsStr]) -> Result<()> {
        let output = Command::new(&self.exe)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ConvertError::Tool {
                message: format!("failed to launch {}: {e}", self.exe.display()),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr.to_string()
        };
        Err(ConvertError::Tool { message })
    }
}

fn resolve_from_env() -> Option<PathBuf> {
    from_override(env::var_os(SEVEN_ZIP_ENV).as_deref())
}

/// Applies the environment override when it names an existing file.
fn from_override(value: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = PathBuf::from(value?);
    candidate.is_file().then_some(candidate)
}

fn resolve_from_install_dirs() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let base = exe.parent()?;

    INSTALL_CANDIDATES.iter().find_map(|candidate| {
        let path = base.join(format!("{candidate}{}", env::consts::EXE_SUFFIX));
        path.is_file().then_some(path)
    })
}

fn resolve_from_path() -> Option<PathBuf> {
    PATH_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}
