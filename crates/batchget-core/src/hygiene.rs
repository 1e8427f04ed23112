//! Install directory lifecycle.
//!
//! An installation that fails, or that only pulls dependencies, leaves an
//! empty directory behind. [`DirGuard`] creates the directory up front and
//! removes it again on drop if nothing was written into it.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Owns an install directory for the duration of one job.
#[derive(Debug)]
pub struct DirGuard {
    path: PathBuf,
}

impl DirGuard {
    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from directory creation, e.g. when a parent is
    /// not writable or a file already exists at `path`.
    pub fn acquire(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        match remove_if_empty(&self.path) {
            Ok(true) => debug!(path = %self.path.display(), "removed empty install directory"),
            Ok(false) => {}
            Err(e) => warn!(path = %self.path.display(), "clean empty dir failed: {e}"),
        }
    }
}

/// Remove `dir` if it exists and has no entries. Returns whether it was removed.
///
/// # Errors
///
/// Returns the I/O error from listing or removing the directory. A missing
/// directory is not an error.
pub fn remove_if_empty(dir: &Path) -> io::Result<bool> {
    let mut entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if entries.next().is_some() {
        return Ok(false);
    }

    std::fs::remove_dir(dir)?;
    Ok(true)
}
