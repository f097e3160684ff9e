//! Subcommand implementations.
//!
//! Every per-group command follows the same shape: load the config, pick
//! the requested (or all active) groups, run one [`ConfGroup`] operation per
//! group, record each result, print the summary, and fail if any group
//! failed.
pub mod apply;
pub mod backup;
pub mod check;
pub mod diff;
pub mod groups;
pub mod hooks;
pub mod install;
pub mod sync;

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::context::Context;
use crate::error::GroupError;
use crate::exec::{Executor, SystemExecutor};
use crate::group::ConfGroup;
use crate::logging::{GroupStatus, Log, Logger};
use crate::platform::Host;
use crate::resources::copy::CopyStrategy;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Config,
    /// Host used for group filtering.
    pub host: Host,
    /// Logger that collects per-group results.
    pub log: Arc<Logger>,
    /// Context handed to group operations.
    pub ctx: Context,
}

impl CommandSetup {
    /// Load the configuration, detect the host, and pick a copy strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if no config file is found or it fails to load.
    pub fn init(global: &GlobalOpts, log: Arc<Logger>) -> Result<Self> {
        log.stage("Loading configuration");
        let config = Config::discover_and_load(global.config.as_deref())?;
        log.info(&format!("config: {}", config.path.display()));

        let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
        let host = global
            .host
            .clone()
            .map_or_else(|| Host::detect(executor.as_ref()), Host::new);

        let setup = Self::new(config, host, log, executor);
        setup.report();
        Ok(setup)
    }

    /// Assemble a setup from already loaded parts.
    #[must_use]
    pub fn new(config: Config, host: Host, log: Arc<Logger>, executor: Arc<dyn Executor>) -> Self {
        let ctx = Context::new(&config.repo, log.clone(), executor);
        Self {
            config,
            host,
            log,
            ctx,
        }
    }

    /// Replace the detected copy strategy.
    #[must_use]
    pub fn with_copier(self, copier: Arc<dyn CopyStrategy>) -> Self {
        Self {
            ctx: self.ctx.with_copier(copier),
            ..self
        }
    }

    fn report(&self) {
        let active = self.config.active_groups(&self.host.name);
        self.log.info(&format!(
            "host: {}, {} of {} groups active",
            self.host,
            active.len(),
            self.config.groups.len()
        ));
        self.log.debug(&format!("repo: {}", self.config.repo.display()));
        self.log
            .debug(&format!("copy strategy: {}", self.ctx.copier.name()));

        let warnings = self.config.warnings(&self.host.name);
        if !warnings.is_empty() {
            self.log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                self.log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.group, warning.item, warning.message
                ));
            }
        }
    }

    /// The groups named in `names`, or every active group when empty.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first group that is not active on this
    /// host.
    pub fn select(&self, names: &[String]) -> Result<Vec<&ConfGroup>> {
        let active = self.config.active_groups(&self.host.name);
        if names.is_empty() {
            return Ok(active);
        }
        names
            .iter()
            .map(|name| {
                active
                    .iter()
                    .find(|g| g.name == *name)
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("Group '{name}' not found."))
            })
            .collect()
    }
}

/// What happened to one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Summary status.
    pub status: GroupStatus,
    /// Short note shown next to the group in the summary.
    pub message: Option<String>,
}

impl Outcome {
    /// The operation changed or verified something.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: GroupStatus::Ok,
            message: Some(message.into()),
        }
    }

    /// There was nothing to do.
    #[must_use]
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: GroupStatus::Skipped,
            message: Some(message.into()),
        }
    }

    /// The operation ran but its result is a failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: GroupStatus::Failed,
            message: Some(message.into()),
        }
    }
}

/// Run `op` on every selected group, continuing past failures.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn for_each_group(
    setup: &CommandSetup,
    names: &[String],
    stage: &str,
    mut op: impl FnMut(&ConfGroup) -> Result<Outcome, GroupError>,
) -> Result<()> {
    let groups = setup.select(names)?;
    setup.log.stage(stage);

    for group in groups {
        setup.log.debug(&format!("group {}", group.name));
        match op(group) {
            Ok(outcome) => {
                setup
                    .log
                    .record_group(&group.name, outcome.status, outcome.message.as_deref());
            }
            Err(e) => {
                setup.log.error(&format!("{}: {e}", group.name));
                setup
                    .log
                    .record_group(&group.name, GroupStatus::Failed, Some(&e.to_string()));
            }
        }
    }

    setup.log.print_summary();

    let count = setup.log.failure_count();
    if count > 0 {
        bail!("{count} group(s) failed");
    }
    Ok(())
}

/// `"1 file"`, `"2 files"`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
