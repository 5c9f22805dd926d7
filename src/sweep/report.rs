//! Sweep results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to a single directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Older than the threshold and deleted
    Removed,
    /// Older than the threshold; left in place because of dry-run
    WouldRemove,
    /// Not older than the threshold
    Retained,
    /// A directory; never descended into or removed
    SkippedDirectory,
    /// Stat or removal failed
    Failed {
        /// Error description
        reason: String,
    },
}

/// Outcome for one entry of the swept directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    /// Path of the entry
    pub path: PathBuf,

    /// Age in whole seconds, when it could be determined
    pub age_secs: Option<u64>,

    /// What the sweeper did with it
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

/// Result of one sweep pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Directory that was swept
    pub directory: PathBuf,

    /// Effective threshold in seconds
    pub max_age_secs: u64,

    /// When the pass started
    pub started_at: DateTime<Utc>,

    /// The directory did not exist; nothing was inspected
    pub directory_missing: bool,

    /// Whether deletions were suppressed
    pub dry_run: bool,

    /// Per-entry outcomes, in listing order
    pub entries: Vec<EntryReport>,
}

impl SweepReport {
    /// Create an empty report.
    pub fn new(directory: &Path, max_age: Duration, started_at: DateTime<Utc>) -> Self {
        Self {
            directory: directory.to_path_buf(),
            max_age_secs: max_age.as_secs(),
            started_at,
            directory_missing: false,
            dry_run: false,
            entries: Vec::new(),
        }
    }

    /// Record an entry outcome.
    pub fn record(&mut self, path: PathBuf, age: Option<Duration>, outcome: EntryOutcome) {
        self.entries.push(EntryReport {
            path,
            age_secs: age.map(|a| a.as_secs()),
            outcome,
        });
    }

    /// Number of entries actually deleted.
    pub fn removed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Removed))
    }

    /// Number of entries a dry run would have deleted.
    pub fn would_remove(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::WouldRemove))
    }

    /// Number of files kept because they are young enough.
    pub fn retained(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Retained))
    }

    /// Number of entries that failed.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Failed { .. }))
    }

    /// Entries that failed, with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            EntryOutcome::Failed { reason } => Some((e.path.as_path(), reason.as_str())),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}
