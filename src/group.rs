//! Configuration groups and the operations that keep them in sync.
//!
//! A [`ConfGroup`] is immutable once built. Every operation walks its lists
//! in declaration order and stops at the first error, leaving whatever it
//! already did in place; deciding whether to continue with the next group
//! is up to the caller.
use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::GroupError;
use crate::resources::backup::BackupRotator;
use crate::resources::command::{CommandRunner, HookCommand};
use crate::resources::diff;
use crate::resources::mapping::{Mapping, compatible_kind};

/// A binary that `check` expects on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryCheck {
    /// Program name looked up on `PATH`.
    pub binary: String,
    /// What the binary is needed for, shown when it is missing.
    pub description: String,
}

impl BinaryCheck {
    /// Create a binary check.
    #[must_use]
    pub fn new(binary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            description: description.into(),
        }
    }
}

/// A named bundle of mappings and hooks sharing one destination root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfGroup {
    /// Group name.
    pub name: String,
    /// Absolute synchronization root.
    pub dest: PathBuf,
    /// Mappings copied by `install`.
    pub install_files: Vec<Mapping>,
    /// Mappings copied back by `synchronize`; `None` means `install_files`.
    pub sync_files: Option<Vec<Mapping>>,
    /// Binaries required by the group.
    pub check_binaries: Vec<BinaryCheck>,
    /// Commands run by `configure`.
    pub config_cmds: Vec<HookCommand>,
    /// Commands run by `post_install`.
    pub post_install_cmds: Vec<HookCommand>,
    /// Number of backups kept per item; `None` keeps all of them.
    pub max_backups: Option<usize>,
    /// Hosts the group is restricted to; empty means every host.
    pub hosts: Vec<String>,
}

/// Result of [`ConfGroup::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Nothing differed; nothing was touched.
    UpToDate,
    /// The group was backed up, installed and post-installed.
    Applied {
        /// Number of backups taken.
        backups: usize,
    },
}

impl ConfGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dest: dest.into(),
            ..Self::default()
        }
    }

    /// Whether the group applies on `host`.
    #[must_use]
    pub fn is_active(&self, host: &str) -> bool {
        self.hosts.is_empty() || self.hosts.iter().any(|h| h == host)
    }

    /// Mappings used by [`synchronize`](Self::synchronize).
    #[must_use]
    pub fn sync_mappings(&self) -> &[Mapping] {
        self.sync_files.as_deref().unwrap_or(&self.install_files)
    }

    /// Copy every `install_files` mapping from the repository into `dest`.
    ///
    /// All mappings are resolved before anything is copied, so a missing
    /// source, a kind clash, or (without `force`) an existing destination
    /// leaves the filesystem untouched. No backup is taken.
    ///
    /// # Errors
    ///
    /// [`GroupError::InvalidMapping`] or [`GroupError::DestinationExists`]
    /// before any copy; [`GroupError::Copy`] from the first failing copy,
    /// after which later mappings are skipped.
    pub fn install(&self, ctx: &Context, force: bool) -> Result<(), GroupError> {
        let mut plan = Vec::with_capacity(self.install_files.len());
        for mapping in &self.install_files {
            let (resolved, kind) = mapping.resolve(&ctx.repo, &self.dest)?;
            if !force && resolved.destination.symlink_metadata().is_ok() {
                return Err(GroupError::DestinationExists {
                    path: resolved.destination,
                });
            }
            plan.push((resolved, kind));
        }

        for (resolved, kind) in &plan {
            ctx.log.debug(&format!(
                "{} {} -> {}",
                ctx.copier.name(),
                resolved.source.display(),
                resolved.destination.display()
            ));
            ctx.copier
                .copy(&resolved.source, &resolved.destination, *kind)?;
        }
        Ok(())
    }

    /// Move every existing `install_files` destination to a timestamped
    /// backup, whether or not it differs from the source.
    ///
    /// Returns the backups created, in mapping order.
    ///
    /// # Errors
    ///
    /// Returns the first [`GroupError::BackupCollision`] or
    /// [`GroupError::Io`]; earlier backups stay in place.
    pub fn backup(&self, ctx: &Context) -> Result<Vec<PathBuf>, GroupError> {
        let rotator = BackupRotator::new(self.max_backups);
        let mut made = Vec::new();
        for mapping in &self.install_files {
            let target = mapping.locate(&ctx.repo, &self.dest).destination;
            if let Some(backup) = rotator.backup_if_exists(&target)? {
                ctx.log.debug(&format!(
                    "backed up {} -> {}",
                    target.display(),
                    backup.display()
                ));
                made.push(backup);
            }
        }
        Ok(made)
    }

    /// `true` if any `install_files` mapping differs between repository and
    /// destination. With `verbose`, every difference of every mapping is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::Io`] if a tree cannot be read.
    pub fn diff(&self, ctx: &Context, verbose: bool) -> Result<bool, GroupError> {
        let report = verbose.then_some(ctx.log.as_ref());
        let mut any = false;
        for mapping in &self.install_files {
            let resolved = mapping.locate(&ctx.repo, &self.dest);
            any |= diff::differs(&resolved.source, &resolved.destination, report)?;
        }
        Ok(any)
    }

    /// Copy every sync mapping back from the destination into the
    /// repository. Mappings whose destination is missing are skipped and
    /// the source is left alone.
    ///
    /// Returns the number of mappings copied.
    ///
    /// # Errors
    ///
    /// [`GroupError::InvalidMapping`] when the two sides overlap or their
    /// kinds clash; [`GroupError::Copy`] from the copy strategy.
    pub fn synchronize(&self, ctx: &Context) -> Result<usize, GroupError> {
        let mut copied = 0;
        for mapping in self.sync_mappings() {
            let resolved = mapping.locate(&ctx.repo, &self.dest);
            resolved.check_disjoint()?;
            if resolved.destination.symlink_metadata().is_err() {
                ctx.log.debug(&format!(
                    "skipping {}: not present",
                    resolved.destination.display()
                ));
                continue;
            }
            let kind = compatible_kind(&resolved.destination, &resolved.source)?;
            ctx.copier
                .copy(&resolved.destination, &resolved.source, kind)?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Run `config_cmds` in order.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::CommandFailed`] for the first failing command.
    pub fn configure(&self, ctx: &Context, verbose: bool) -> Result<(), GroupError> {
        self.runner(ctx)
            .run_all(&self.config_cmds, verbose, ctx.log.as_ref())
    }

    /// Run `post_install_cmds` in order.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::CommandFailed`] for the first failing command.
    pub fn post_install(&self, ctx: &Context, verbose: bool) -> Result<(), GroupError> {
        self.runner(ctx)
            .run_all(&self.post_install_cmds, verbose, ctx.log.as_ref())
    }

    /// `true` if every binary in `check_binaries` resolves on `PATH`.
    ///
    /// Each missing binary is reported as a warning.
    pub fn check(&self, ctx: &Context) -> bool {
        let mut ok = true;
        for check in &self.check_binaries {
            if ctx.executor.which(&check.binary).is_none() {
                ctx.log.warn(&format!(
                    "{}: '{}' not found ({})",
                    self.name, check.binary, check.description
                ));
                ok = false;
            }
        }
        ok
    }

    /// Bring the destination up to date: if anything differs, back up,
    /// force-install and run the post-install hooks.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step; later steps do not run.
    pub fn apply(&self, ctx: &Context, verbose: bool) -> Result<ApplyOutcome, GroupError> {
        if !self.diff(ctx, verbose)? {
            return Ok(ApplyOutcome::UpToDate);
        }
        let backups = self.backup(ctx)?;
        self.install(ctx, true)?;
        self.post_install(ctx, verbose)?;
        Ok(ApplyOutcome::Applied {
            backups: backups.len(),
        })
    }

    fn runner<'a>(&'a self, ctx: &'a Context) -> CommandRunner<'a> {
        CommandRunner::new(ctx.executor.as_ref(), self.dest.as_path())
    }

    /// Absolute destination of every install mapping, for display.
    #[must_use]
    pub fn destinations(&self, repo: &Path) -> Vec<PathBuf> {
        self.install_files
            .iter()
            .map(|m| m.locate(repo, &self.dest).destination)
            .collect()
    }
}
