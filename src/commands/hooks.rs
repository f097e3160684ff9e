//! `configure` and `post-install` subcommands.
use anyhow::Result;

use super::{CommandSetup, Outcome, for_each_group, plural};
use crate::cli::GroupArgs;

/// Run each selected group's `config_cmds`.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn configure(setup: &CommandSetup, args: &GroupArgs, verbose: bool) -> Result<()> {
    for_each_group(setup, &args.groups, "Configuring", |group| {
        if group.config_cmds.is_empty() {
            return Ok(Outcome::skipped("no commands"));
        }
        group.configure(&setup.ctx, verbose)?;
        Ok(Outcome::ok(plural(group.config_cmds.len(), "command")))
    })
}

/// Run each selected group's `post_install_cmds`.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn post_install(setup: &CommandSetup, args: &GroupArgs, verbose: bool) -> Result<()> {
    for_each_group(setup, &args.groups, "Running post-install commands", |group| {
        if group.post_install_cmds.is_empty() {
            return Ok(Outcome::skipped("no commands"));
        }
        group.post_install(&setup.ctx, verbose)?;
        Ok(Outcome::ok(plural(group.post_install_cmds.len(), "command")))
    })
}
