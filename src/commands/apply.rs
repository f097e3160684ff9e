//! `apply` subcommand.
use anyhow::Result;

use super::{CommandSetup, Outcome, for_each_group, plural};
use crate::cli::GroupArgs;
use crate::group::ApplyOutcome;

/// Bring every selected group that differs up to date.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn run(setup: &CommandSetup, args: &GroupArgs, verbose: bool) -> Result<()> {
    for_each_group(setup, &args.groups, "Applying", |group| {
        match group.apply(&setup.ctx, verbose)? {
            ApplyOutcome::UpToDate => Ok(Outcome::skipped("already in sync")),
            ApplyOutcome::Applied { backups } => Ok(Outcome::ok(format!(
                "applied, {}",
                plural(backups, "backup")
            ))),
        }
    })
}
