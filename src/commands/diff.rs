//! `diff` subcommand.
use anyhow::Result;

use super::{CommandSetup, Outcome, for_each_group};
use crate::cli::GroupArgs;

/// Report which selected groups differ from the repository.
///
/// With `verbose`, every difference is printed as it is found.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn run(setup: &CommandSetup, args: &GroupArgs, verbose: bool) -> Result<()> {
    for_each_group(setup, &args.groups, "Comparing", |group| {
        if group.diff(&setup.ctx, verbose)? {
            Ok(Outcome::ok("differs"))
        } else {
            Ok(Outcome::skipped("in sync"))
        }
    })
}
