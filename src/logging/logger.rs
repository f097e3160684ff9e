//! The production [`Log`]: forwards to `tracing` and keeps per-group
//! results for the end-of-run summary.
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::STAGE_TARGET;
use super::types::{GroupEntry, GroupStatus, Log};
use super::utils::log_file_path;

/// Logger shared by every command.
///
/// Console and file output are handled by the subscriber installed with
/// [`init_subscriber`](super::init_subscriber); the file at
/// `<cache>/confit/<command>.log` receives every message, debug included.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<GroupEntry>>,
    log_file: Option<PathBuf>,
}

/// Counts per status, rendered as the summary's last line.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    ok: usize,
    skipped: usize,
    failed: usize,
}

impl Tally {
    fn of(entries: &[GroupEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut t, e| {
            match e.status {
                GroupStatus::Ok => t.ok += 1,
                GroupStatus::Skipped => t.skipped += 1,
                GroupStatus::Failed => t.failed += 1,
            }
            t
        })
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} groups: \x1b[32m{} ok\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[31m{} failed\x1b[0m",
            self.ok + self.skipped + self.failed,
            self.ok,
            self.skipped,
            self.failed
        )
    }
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// Only remembers where the log file lives so the summary can point at
    /// it; the file is written by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    pub(super) const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Where this run's log file is written.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Every recorded group result, in recording order.
    #[must_use]
    pub fn group_entries(&self) -> Vec<GroupEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Number of groups recorded as failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        Tally::of(&self.group_entries()).failed
    }

    /// `true` if any group failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Log one colored line per recorded group, the totals, and the log
    /// file location. Does nothing if no group was recorded.
    pub fn print_summary(&self) {
        let entries = self.group_entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");
        for entry in &entries {
            self.info(&format!("{}{entry}\x1b[0m", entry.status.color()));
        }
        self.info(&Tally::of(&entries).to_string());
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn record_group(&self, name: &str, status: GroupStatus, message: Option<&str>) {
        let entry = GroupEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        };
        tracing::debug!("{entry}");
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(entry);
        }
    }
}
