//! Turning raw group records into validated [`ConfGroup`] values.
//!
//! Hard errors ([`ConfigError::Invalid`]) stop loading; soft problems are
//! collected as [`ValidationWarning`]s and only logged.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::toml_loader::{GroupRecord, OneOrMany, Pair};
use crate::error::ConfigError;
use crate::group::{BinaryCheck, ConfGroup};
use crate::resources::command::HookCommand;
use crate::resources::mapping::Mapping;

/// Working directory used when a command omits one.
const DEFAULT_WORKDIR: &str = ".";

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The group the warning is about.
    pub group: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Expand a leading `~` to `home`.
///
/// Only `~` on its own and `~/...` are expanded; `~user` is left as is.
#[must_use]
pub fn expand_tilde(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (s, Some(home)) if s.starts_with("~/") || s.starts_with("~\\") => {
            home.join(s.get(2..).unwrap_or_default())
        }
        (s, _) => PathBuf::from(s),
    }
}

/// Build a [`ConfGroup`] from a raw record.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the name is empty, `dest` is not
/// absolute after `~` expansion, or `max_backups` is below one.
pub fn build_group(record: GroupRecord, home: Option<&Path>) -> Result<ConfGroup, ConfigError> {
    let invalid = |message: String| ConfigError::Invalid {
        group: record.name.clone(),
        message,
    };

    if record.name.trim().is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }

    let dest = expand_tilde(&record.dest, home);
    if !dest.is_absolute() {
        return Err(invalid(format!(
            "dest must be an absolute path, got '{}'",
            record.dest
        )));
    }

    let max_backups = match record.max_backups {
        None => None,
        Some(n) if n >= 1 => Some(usize::try_from(n).map_err(|e| invalid(e.to_string()))?),
        Some(n) => return Err(invalid(format!("max_backups must be at least 1, got {n}"))),
    };

    let mappings = |pairs: Vec<(String, String)>| -> Vec<Mapping> {
        pairs
            .into_iter()
            .map(|(s, d)| Mapping::new(s, d))
            .collect()
    };
    let hooks = |pairs: Vec<Pair>| -> Vec<HookCommand> {
        pairs
            .into_iter()
            .map(|p| {
                let (cmd, dir) = p.split(DEFAULT_WORKDIR);
                HookCommand::new(cmd, dir)
            })
            .collect()
    };

    Ok(ConfGroup {
        name: record.name,
        dest,
        install_files: mappings(record.install_files),
        sync_files: record.sync_files.map(mappings),
        check_binaries: record
            .check_binaries
            .into_iter()
            .map(|p| {
                let (binary, description) = p.split("");
                BinaryCheck::new(binary, description)
            })
            .collect(),
        config_cmds: hooks(record.config_cmds),
        post_install_cmds: hooks(record.post_install_cmds),
        max_backups,
        hosts: record.hosts.map(OneOrMany::into_vec).unwrap_or_default(),
    })
}

/// Look for problems that do not prevent loading.
///
/// Reports install sources missing from `repo` and destinations mapped
/// more than once within the group.
#[must_use]
pub fn validate_group(group: &ConfGroup, repo: &Path) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for mapping in &group.install_files {
        let resolved = mapping.locate(repo, &group.dest);
        if !resolved.source.exists() {
            warnings.push(ValidationWarning::new(
                &group.name,
                mapping.source.display().to_string(),
                format!("source does not exist: {}", resolved.source.display()),
            ));
        }
        if !seen.insert(resolved.destination.clone()) {
            warnings.push(ValidationWarning::new(
                &group.name,
                mapping.destination.display().to_string(),
                "destination is mapped more than once",
            ));
        }
    }
    warnings
}
