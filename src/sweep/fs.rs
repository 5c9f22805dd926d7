//! Filesystem abstraction for the sweeper.
//!
//! The sweeper only needs three things from the platform: list a directory,
//! stat an entry, and remove a file. Keeping them behind [`FileSystem`] lets
//! tests inject failures that are awkward to produce on a real disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// A directory entry as seen by the sweeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Full path of the entry
    pub path: PathBuf,
    /// Last modification time
    pub modified: SystemTime,
    /// Whether the entry is a directory (after following symlinks)
    pub is_dir: bool,
}

impl TrackedFile {
    /// Age of the entry relative to `now`.
    ///
    /// Modification times in the future count as age zero.
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified).unwrap_or(Duration::ZERO)
    }
}

/// Filesystem operations used by the sweeper.
pub trait FileSystem {
    /// Whether `path` exists at all.
    fn exists(&self, path: &Path) -> bool;

    /// Paths of the direct entries of `dir`, in listing order.
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Stat a single entry.
    fn inspect(&self, path: &Path) -> io::Result<TrackedFile>;

    /// Remove a single non-directory entry.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn inspect(&self, path: &Path) -> io::Result<TrackedFile> {
        let metadata = fs::metadata(path)?;
        Ok(TrackedFile {
            path: path.to_path_buf(),
            modified: metadata.modified()?,
            is_dir: metadata.is_dir(),
        })
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
