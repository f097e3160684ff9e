//! Raw TOML schema of the config file.
//!
//! These types mirror the file exactly; [`super::validation`] turns them
//! into [`ConfGroup`](crate::group::ConfGroup) values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top level of `confit.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Repository root, relative to the config file's directory.
    #[serde(default)]
    pub repo: Option<PathBuf>,
    /// `[[group]]` tables in declaration order.
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupRecord>,
}

/// One `[[group]]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupRecord {
    /// Group name.
    pub name: String,
    /// Destination root; `~` expands to the home directory.
    pub dest: String,
    /// Host restriction, `host = "a"` or `hosts = ["a", "b"]`.
    #[serde(default, alias = "host")]
    pub hosts: Option<OneOrMany>,
    /// `[source, destination]` pairs.
    #[serde(default, alias = "files")]
    pub install_files: Vec<(String, String)>,
    /// Reverse-sync pairs; omitted means `install_files`.
    #[serde(default)]
    pub sync_files: Option<Vec<(String, String)>>,
    /// `"binary"` or `["binary", "description"]`.
    #[serde(default)]
    pub check_binaries: Vec<Pair>,
    /// `"command"` or `["command", "workdir"]`.
    #[serde(default)]
    pub config_cmds: Vec<Pair>,
    /// `"command"` or `["command", "workdir"]`.
    #[serde(default)]
    pub post_install_cmds: Vec<Pair>,
    /// Backups kept per item.
    #[serde(default)]
    pub max_backups: Option<i64>,
}

/// A single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// `host = "laptop"`
    One(String),
    /// `hosts = ["laptop", "desktop"]`
    Many(Vec<String>),
}

impl OneOrMany {
    /// Flatten into a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

/// A bare string or a two-element `[value, extra]` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Pair {
    /// Only the first element was given.
    Bare(String),
    /// Both elements were given.
    Full(String, String),
}

impl Pair {
    /// Split into `(value, extra)`, filling a missing `extra` with `default`.
    #[must_use]
    pub fn split(self, default: &str) -> (String, String) {
        match self {
            Self::Bare(a) => (a, default.to_string()),
            Self::Full(a, b) => (a, b),
        }
    }
}

/// Parse TOML text.
///
/// `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text is not valid TOML or does not
/// match the schema.
pub fn parse(text: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

/// Read and parse the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Parse`] if it cannot be parsed.
pub fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}
