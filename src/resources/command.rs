//! Hook commands (`config_cmds`, `post_install_cmds`) run relative to a
//! group's destination root.
use std::path::{Path, PathBuf};

use crate::error::GroupError;
use crate::exec::Executor;
use crate::logging::Log;

/// A declared `(command, workdir)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCommand {
    /// Shell command line, passed to `sh -c` (`cmd /C` on Windows).
    pub command: String,
    /// Working directory, relative to the group `dest` unless absolute.
    pub workdir: PathBuf,
}

impl HookCommand {
    /// Create a hook command.
    #[must_use]
    pub fn new(command: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            workdir: workdir.into(),
        }
    }
}

/// Runs hook commands for one destination root.
#[derive(Debug, Clone, Copy)]
pub struct CommandRunner<'a> {
    executor: &'a dyn Executor,
    dest: &'a Path,
}

impl<'a> CommandRunner<'a> {
    /// Create a runner resolving working directories against `dest`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor, dest: &'a Path) -> Self {
        Self { executor, dest }
    }

    /// The directory `hook` runs in.
    #[must_use]
    pub fn workdir(&self, hook: &HookCommand) -> PathBuf {
        self.dest.join(&hook.workdir)
    }

    /// Run `hook` and wait for it.
    ///
    /// The command's stdout is logged at debug level, or at info level when
    /// `verbose` is set.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::CommandFailed`] if the command exits non-zero
    /// or cannot be started at all.
    pub fn run(&self, hook: &HookCommand, verbose: bool, log: &dyn Log) -> Result<(), GroupError> {
        let dir = self.workdir(hook);
        log.debug(&format!("running '{}' in {}", hook.command, dir.display()));
        let result = self
            .executor
            .run_shell(&dir, &hook.command)
            .map_err(|e| GroupError::CommandFailed {
                command: hook.command.clone(),
                code: None,
                stderr: format!("{e:#}"),
            })?;

        for line in result.stdout.lines() {
            if verbose {
                log.info(line);
            } else {
                log.debug(line);
            }
        }

        if !result.success {
            return Err(GroupError::CommandFailed {
                command: hook.command.clone(),
                code: result.code,
                stderr: result.stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Run every hook in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`GroupError::CommandFailed`]; later hooks are not
    /// started.
    pub fn run_all(
        &self,
        hooks: &[HookCommand],
        verbose: bool,
        log: &dyn Log,
    ) -> Result<(), GroupError> {
        for hook in hooks {
            self.run(hook, verbose, log)?;
        }
        Ok(())
    }
}
