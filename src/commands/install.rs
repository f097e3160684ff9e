//! `install` subcommand.
use anyhow::Result;

use super::{CommandSetup, Outcome, for_each_group, plural};
use crate::cli::InstallOpts;

/// Copy each selected group's files into its destination.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn run(setup: &CommandSetup, opts: &InstallOpts) -> Result<()> {
    for_each_group(setup, &opts.groups.groups, "Installing", |group| {
        group.install(&setup.ctx, opts.force)?;
        Ok(Outcome::ok(plural(group.install_files.len(), "mapping")))
    })
}
