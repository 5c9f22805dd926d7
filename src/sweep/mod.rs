//! Time-based retention for a flat upload directory.
//!
//! The sweeper lists the direct entries of one directory, and removes every
//! non-directory entry whose age (now minus last modification) is strictly
//! greater than the configured threshold. Failures on individual entries are
//! recorded and logged; they never stop the pass.
//!
//! # Example
//!
//! ```no_run
//! use uploadkit::sweep::{SweepConfig, Sweeper};
//!
//! fn main() -> uploadkit::Result<()> {
//!     let config = SweepConfig::new()
//!         .with_upload_dir("uploads")
//!         .with_max_age_hours(24);
//!     let report = Sweeper::new(config).sweep()?;
//!     println!("removed {} files", report.removed());
//!     Ok(())
//! }
//! ```

mod config;
mod fs;
mod report;

pub use config::{legacy_threshold, SweepConfig, DEFAULT_MAX_FILE_AGE_HOURS, DEFAULT_UPLOAD_DIR};
pub use fs::{FileSystem, StdFileSystem, TrackedFile};
pub use report::{EntryOutcome, EntryReport, SweepReport};

use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Applies a [`SweepConfig`] to a directory.
pub struct Sweeper<F: FileSystem = StdFileSystem> {
    config: SweepConfig,
    fs: F,
}

impl Sweeper<StdFileSystem> {
    /// Create a sweeper on the real filesystem.
    pub fn new(config: SweepConfig) -> Self {
        Self::with_file_system(config, StdFileSystem)
    }
}

impl<F: FileSystem> Sweeper<F> {
    /// Create a sweeper on a custom filesystem.
    pub fn with_file_system(config: SweepConfig, fs: F) -> Self {
        Self { config, fs }
    }

    /// The active configuration.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Run one pass using the current wall-clock time.
    pub fn sweep(&self) -> Result<SweepReport> {
        self.sweep_at(SystemTime::now())
    }

    /// Run one pass treating `now` as the current time.
    ///
    /// Returns an error only when the directory exists but cannot be listed.
    pub fn sweep_at(&self, now: SystemTime) -> Result<SweepReport> {
        let dir = &self.config.upload_dir;
        let started_at: DateTime<Utc> = now.into();
        let mut report = SweepReport::new(dir, self.config.max_age, started_at);
        report.dry_run = self.config.dry_run;

        if !self.fs.exists(dir) {
            log::warn!("Upload folder {} does not exist.", dir.display());
            report.directory_missing = true;
            return Ok(report);
        }

        let entries = self.fs.list(dir).map_err(|source| Error::DirectoryRead {
            path: dir.clone(),
            source,
        })?;
        log::debug!("Inspecting {} entries in {}", entries.len(), dir.display());

        for path in entries {
            self.visit(path, now, &mut report);
        }

        if self.config.dry_run {
            log::info!(
                "Dry run completed: {} old files would be removed",
                report.would_remove()
            );
        } else {
            log::info!("Cleanup completed: removed {} old files", report.removed());
        }

        Ok(report)
    }

    fn visit(&self, path: PathBuf, now: SystemTime, report: &mut SweepReport) {
        let file = match self.fs.inspect(&path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Error inspecting file {}: {}", path.display(), e);
                report.record(path, None, EntryOutcome::Failed { reason: e.to_string() });
                return;
            }
        };

        if file.is_dir {
            report.record(file.path, None, EntryOutcome::SkippedDirectory);
            return;
        }

        let age = file.age(now);
        if age <= self.config.max_age {
            report.record(file.path, Some(age), EntryOutcome::Retained);
            return;
        }

        if self.config.dry_run {
            log::info!("Would remove old file: {}", file.path.display());
            report.record(file.path, Some(age), EntryOutcome::WouldRemove);
            return;
        }

        match self.fs.remove_file(&file.path) {
            Ok(()) => {
                log::info!("Removed old file: {}", file.path.display());
                report.record(file.path, Some(age), EntryOutcome::Removed);
            }
            Err(e) => {
                log::warn!("Error removing file {}: {}", file.path.display(), e);
                report.record(file.path, Some(age), EntryOutcome::Failed { reason: e.to_string() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory filesystem with injectable failures.
    #[derive(Default)]
    struct MemFs {
        dir: PathBuf,
        entries: Mutex<Vec<TrackedFile>>,
        deny_remove: Vec<PathBuf>,
        deny_list: bool,
        missing: bool,
    }

    impl MemFs {
        fn new(dir: &str) -> Self {
            Self {
                dir: PathBuf::from(dir),
                ..Default::default()
            }
        }

        fn file(self, name: &str, modified: SystemTime) -> Self {
            self.push(name, modified, false)
        }

        fn subdir(self, name: &str, modified: SystemTime) -> Self {
            self.push(name, modified, true)
        }

        fn push(self, name: &str, modified: SystemTime, is_dir: bool) -> Self {
            self.entries.lock().unwrap().push(TrackedFile {
                path: self.dir.join(name),
                modified,
                is_dir,
            });
            self
        }

        fn remaining(&self) -> Vec<PathBuf> {
            self.entries.lock().unwrap().iter().map(|f| f.path.clone()).collect()
        }
    }

    impl FileSystem for MemFs {
        fn exists(&self, path: &Path) -> bool {
            !self.missing && path == self.dir
        }

        fn list(&self, _dir: &Path) -> io::Result<Vec<PathBuf>> {
            if self.deny_list {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            Ok(self.remaining())
        }

        fn inspect(&self, path: &Path) -> io::Result<TrackedFile> {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.path == path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "vanished"))
        }

        fn remove_file(&self, path: &Path) -> io::Result<()> {
            if self.deny_remove.iter().any(|p| p == path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"));
            }
            self.entries.lock().unwrap().retain(|f| f.path != path);
            Ok(())
        }
    }

    fn hours(h: u64) -> Duration {
        Duration::from_secs(h * 3600)
    }

    #[test]
    fn test_legacy_threshold_removes_both() {
        let now = SystemTime::now();
        let fs = MemFs::new("uploads")
            .file("a.txt", now - hours(4))
            .file("b.txt", now - hours(6));

        let sweeper = Sweeper::with_file_system(SweepConfig::legacy(5), fs);
        let report = sweeper.sweep_at(now).unwrap();

        assert_eq!(report.removed(), 2);
        assert!(sweeper.fs.remaining().is_empty());
    }

    #[test]
    fn test_corrected_threshold_keeps_younger_file() {
        let now = SystemTime::now();
        let fs = MemFs::new("uploads")
            .file("a.txt", now - hours(4))
            .file("b.txt", now - hours(6));

        let config = SweepConfig::new().with_max_age_hours(5);
        let sweeper = Sweeper::with_file_system(config, fs);
        let report = sweeper.sweep_at(now).unwrap();

        assert_eq!(report.removed(), 1);
        assert_eq!(report.retained(), 1);
        assert_eq!(sweeper.fs.remaining(), vec![PathBuf::from("uploads/a.txt")]);
    }

    #[test]
    fn test_age_equal_to_threshold_is_retained() {
        let now = SystemTime::now();
        let fs = MemFs::new("uploads").file("edge.txt", now - Duration::from_secs(300));

        let sweeper = Sweeper::with_file_system(SweepConfig::default(), fs);
        let report = sweeper.sweep_at(now).unwrap();

        assert_eq!(report.removed(), 0);
        assert_eq!(report.retained(), 1);
    }

    #[test]
    fn test_directories_are_skipped() {
        let now = SystemTime::now();
        let fs = MemFs::new("uploads")
            .subdir("old-dir", now - hours(100))
            .file("old.txt", now - hours(100));

        let sweeper = Sweeper::with_file_system(SweepConfig::default(), fs);
        let report = sweeper.sweep_at(now).unwrap();

        assert_eq!(report.removed(), 1);
        assert_eq!(sweeper.fs.remaining(), vec![PathBuf::from("uploads/old-dir")]);
        assert!(report
            .entries
            .iter()
            .any(|e| e.outcome == EntryOutcome::SkippedDirectory));
    }

    #[test]
    fn test_missing_directory_reports_and_returns() {
        let mut fs = MemFs::new("uploads").file("a.txt", SystemTime::UNIX_EPOCH);
        fs.missing = true;

        let sweeper = Sweeper::with_file_system(SweepConfig::default(), fs);
        let report = sweeper.sweep().unwrap();

        assert!(report.directory_missing);
        assert!(report.entries.is_empty());
        assert_eq!(sweeper.fs.remaining().len(), 1);
    }

    #[test]
    fn test_removal_failure_does_not_stop_sweep() {
        let now = SystemTime::now();
        let mut fs = MemFs::new("uploads")
            .file("a.txt", now - hours(10))
            .file("locked.txt", now - hours(10))
            .file("c.txt", now - hours(10));
        fs.deny_remove = vec![PathBuf::from("uploads/locked.txt")];

        let sweeper = Sweeper::with_file_system(SweepConfig::default(), fs);
        let report = sweeper.sweep_at(now).unwrap();

        assert_eq!(report.removed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(sweeper.fs.remaining(), vec![PathBuf::from("uploads/locked.txt")]);
    }

    #[test]
    fn test_list_failure_is_an_error() {
        let mut fs = MemFs::new("uploads");
        fs.deny_list = true;

        let sweeper = Sweeper::with_file_system(SweepConfig::default(), fs);
        let result = sweeper.sweep();
        assert!(matches!(result, Err(Error::DirectoryRead { .. })));
    }

    #[test]
    fn test_dry_run_deletes_nothing() {
        let now = SystemTime::now();
        let fs = MemFs::new("uploads")
            .file("a.txt", now - hours(10))
            .file("b.txt", now);

        let config = SweepConfig::default().with_dry_run(true);
        let sweeper = Sweeper::with_file_system(config, fs);
        let report = sweeper.sweep_at(now).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.removed(), 0);
        assert_eq!(report.would_remove(), 1);
        assert_eq!(sweeper.fs.remaining().len(), 2);
    }
}
