//! Per-group results and the [`Log`] trait engine code reports through.
use std::fmt;

/// How a group fared under one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// The operation completed.
    Ok,
    /// Nothing to do (already in sync, nothing to back up, no commands).
    Skipped,
    /// The operation stopped with an error, or found a problem.
    Failed,
}

impl GroupStatus {
    /// Summary marker for this status.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Skipped => "○",
            Self::Failed => "✗",
        }
    }

    /// ANSI color used for this status on the console.
    pub(super) const fn color(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::Skipped => "\x1b[33m",
            Self::Failed => "\x1b[31m",
        }
    }
}

/// One line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    /// Group name.
    pub name: String,
    /// Outcome of the command for this group.
    pub status: GroupStatus,
    /// Short note, e.g. `"2 backups"` or the error text.
    pub message: Option<String>,
}

impl fmt::Display for GroupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.icon(), self.name)?;
        if let Some(message) = &self.message {
            write!(f, " ({message})")?;
        }
        Ok(())
    }
}

/// Sink for everything the engine reports.
///
/// [`Logger`](super::Logger) forwards to `tracing`; tests substitute an
/// in-memory recorder.
pub trait Log: Send + Sync {
    /// Section header.
    fn stage(&self, msg: &str);
    /// Normal output.
    fn info(&self, msg: &str);
    /// Detail shown with `--verbose` and always written to the log file.
    fn debug(&self, msg: &str);
    /// A problem that does not stop the command.
    fn warn(&self, msg: &str);
    /// A problem that fails a group or the command.
    fn error(&self, msg: &str);
    /// Record the outcome of one group for the summary.
    fn record_group(&self, name: &str, status: GroupStatus, message: Option<&str>);
}
