//! Domain-specific error types for the confit engine.
//!
//! Engine code returns typed errors ([`GroupError`], [`ConfigError`]) while
//! command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the config loader before any group is constructed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config file exists at any of the searched locations.
    #[error("no config file found (searched: {})", format_candidates(.searched))]
    NotFound {
        /// Every location that was tried, in search order.
        searched: Vec<PathBuf>,
    },

    /// The config file exists but could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("Invalid config syntax in {}: {message}", .path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A group record is syntactically valid but semantically wrong.
    #[error("Invalid group '{group}': {message}")]
    Invalid {
        /// Name of the offending group.
        group: String,
        /// Human-readable explanation.
        message: String,
    },
}

/// Errors raised by [`ConfGroup`](crate::group::ConfGroup) operations.
///
/// Every variant aborts the running operation; nothing is rolled back.
#[derive(Error, Debug)]
pub enum GroupError {
    /// The source is missing, or the source and destination kinds clash.
    #[error("invalid mapping for {}: {reason}", .path.display())]
    InvalidMapping {
        /// Path that made the mapping invalid.
        path: PathBuf,
        /// Why the mapping was rejected.
        reason: String,
    },

    /// An unforced install would overwrite an existing destination.
    #[error("destination already exists: {} (use --force to overwrite)", .path.display())]
    DestinationExists {
        /// The existing destination.
        path: PathBuf,
    },

    /// The copy strategy failed; the destination may be partially written.
    #[error("failed to copy {}: {source}", .path.display())]
    Copy {
        /// Path being copied when the failure occurred.
        path: PathBuf,
        /// Underlying cause (I/O error or external tool failure).
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A configure or post-install command exited non-zero.
    #[error("command '{command}' failed (exit {}): {stderr}", format_code(.code))]
    CommandFailed {
        /// The command string as declared.
        command: String,
        /// Exit code, `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Captured standard error output.
        stderr: String,
    },

    /// A backup with the same timestamp already exists.
    #[error("backup target already exists: {}", .path.display())]
    BackupCollision {
        /// The backup path that is already taken.
        path: PathBuf,
    },

    /// A filesystem operation outside of a copy failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path the operation was acting on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl GroupError {
    /// Build an [`GroupError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_candidates(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::ref_option)]
fn format_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}
