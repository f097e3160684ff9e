//! `check` subcommand.
use anyhow::Result;

use super::{CommandSetup, Outcome, for_each_group};
use crate::cli::GroupArgs;

/// Verify that each selected group's required binaries are on `PATH`.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any binary is missing.
pub fn run(setup: &CommandSetup, args: &GroupArgs) -> Result<()> {
    for_each_group(setup, &args.groups, "Checking binaries", |group| {
        if group.check_binaries.is_empty() {
            Ok(Outcome::skipped("nothing to check"))
        } else if group.check(&setup.ctx) {
            Ok(Outcome::ok(format!("{} found", group.check_binaries.len())))
        } else {
            Ok(Outcome::failed("missing binaries"))
        }
    })
}
