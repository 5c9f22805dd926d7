//! Retention sweep configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Directory swept when none is configured.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Nominal "hours" value of the historical cleanup job.
pub const DEFAULT_MAX_FILE_AGE_HOURS: u64 = 5;

/// The historical job multiplied its hour setting by 60, not 3600.
const LEGACY_SECONDS_PER_HOUR: u64 = 60;

const SECONDS_PER_HOUR: u64 = 3600;

/// Threshold produced by the historical `hours * 60` arithmetic.
///
/// `legacy_threshold(5)` is five *minutes*. Kept so existing deployments see
/// the same deletions after switching to this crate.
pub fn legacy_threshold(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(LEGACY_SECONDS_PER_HOUR))
}

/// Options for a retention sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Directory whose direct entries are swept
    pub upload_dir: PathBuf,

    /// Files strictly older than this are removed
    pub max_age: Duration,

    /// Report what would be removed without deleting anything
    pub dry_run: bool,
}

impl SweepConfig {
    /// Create a config with defaults (see [`SweepConfig::default`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Config using the historical `hours * 60` seconds threshold.
    pub fn legacy(max_file_age_hours: u64) -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_age: legacy_threshold(max_file_age_hours),
            dry_run: false,
        }
    }

    /// Set the directory to sweep.
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Set the threshold as an explicit duration.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set the threshold in real hours (`hours * 3600` seconds).
    pub fn with_max_age_hours(mut self, hours: u64) -> Self {
        self.max_age = Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR));
        self
    }

    /// Set the threshold using the historical `hours * 60` arithmetic.
    pub fn with_legacy_max_age_hours(mut self, hours: u64) -> Self {
        self.max_age = legacy_threshold(hours);
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for SweepConfig {
    /// `uploads` with the legacy threshold for 5 "hours", i.e. 300 seconds.
    fn default() -> Self {
        Self::legacy(DEFAULT_MAX_FILE_AGE_HOURS)
    }
}
