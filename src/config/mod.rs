//! Config file discovery and loading.
//!
//! The config file is TOML with one `[[group]]` table per configuration
//! group (see [`toml_loader`]); [`validation`] turns the raw tables into
//! [`ConfGroup`] values.
pub mod toml_loader;
pub mod validation;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::group::ConfGroup;
use validation::ValidationWarning;

/// File name looked up in the current directory and under
/// `$XDG_CONFIG_HOME/confit/`.
pub const CONFIG_FILE_NAME: &str = "confit.toml";

/// Environment variable naming a config file explicitly.
pub const CONFIG_ENV: &str = "CONFIT_CONFIG";

/// All loaded configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The file the configuration was read from.
    pub path: PathBuf,
    /// Repository root that mapping sources are resolved against.
    pub repo: PathBuf,
    /// Every group in declaration order, before host filtering.
    pub groups: Vec<ConfGroup>,
}

impl Config {
    /// Locate and load the config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no candidate exists, or any
    /// error from [`Config::load`].
    pub fn discover_and_load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = discover(explicit)?;
        Self::load(&path, home_dir().as_deref())
    }

    /// Load the config file at `path`, expanding `~` against `home`.
    ///
    /// The repository root is `repo` from the file, resolved against the
    /// file's directory, or the file's directory itself when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`], [`ConfigError::Parse`], or
    /// [`ConfigError::Invalid`].
    pub fn load(path: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let file = toml_loader::load_file(path)?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let base = dunce::canonicalize(&base).unwrap_or(base);

        let repo = match file.repo {
            Some(repo) => {
                let expanded = validation::expand_tilde(&repo.to_string_lossy(), home);
                base.join(expanded)
            }
            None => base,
        };

        let groups = file
            .groups
            .into_iter()
            .map(|record| validation::build_group(record, home))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            repo,
            groups,
        })
    }

    /// Groups active on `host`, in declaration order.
    ///
    /// When several active groups share a name the first one wins.
    #[must_use]
    pub fn active_groups(&self, host: &str) -> Vec<&ConfGroup> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .filter(|g| g.is_active(host))
            .filter(|g| seen.insert(g.name.as_str()))
            .collect()
    }

    /// Non-fatal problems in the active groups.
    #[must_use]
    pub fn warnings(&self, host: &str) -> Vec<ValidationWarning> {
        self.active_groups(host)
            .into_iter()
            .flat_map(|g| validation::validate_group(g, &self.repo))
            .collect()
    }
}

/// Candidate config locations in search order, excluding `--config`.
#[must_use]
pub fn candidates(
    env_config: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<&Path>,
) -> Vec<PathBuf> {
    let mut out = Vec::new();
    out.extend(env_config);
    out.push(PathBuf::from(CONFIG_FILE_NAME));
    out.push(PathBuf::from(format!(".{CONFIG_FILE_NAME}")));
    let xdg = xdg_config_home.or_else(|| home.map(|h| h.join(".config")));
    if let Some(xdg) = xdg {
        out.push(xdg.join("confit").join(CONFIG_FILE_NAME));
    }
    if let Some(home) = home {
        out.push(home.join(format!(".{CONFIG_FILE_NAME}")));
    }
    out
}

/// Find the config file to use.
///
/// An explicit path must exist; otherwise the first existing entry of
/// [`candidates`] is returned.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] listing every location tried.
pub fn discover(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let searched = explicit.map_or_else(
        || {
            candidates(
                std::env::var_os(CONFIG_ENV).map(PathBuf::from),
                std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
                home_dir().as_deref(),
            )
        },
        |p| vec![p.to_path_buf()],
    );
    first_existing(searched)
}

fn first_existing(searched: Vec<PathBuf>) -> Result<PathBuf, ConfigError> {
    match searched.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(ConfigError::NotFound { searched }),
    }
}

/// The user's home directory from `HOME` (or `USERPROFILE` on Windows).
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
