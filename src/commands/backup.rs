//! `backup` subcommand.
use anyhow::Result;

use super::{CommandSetup, Outcome, for_each_group, plural};
use crate::cli::GroupArgs;

/// Move each selected group's existing destinations aside.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn run(setup: &CommandSetup, args: &GroupArgs) -> Result<()> {
    for_each_group(setup, &args.groups, "Backing up", |group| {
        let made = group.backup(&setup.ctx)?;
        if made.is_empty() {
            Ok(Outcome::skipped("nothing to back up"))
        } else {
            Ok(Outcome::ok(plural(made.len(), "backup")))
        }
    })
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::setup;
    use crate::logging::GroupStatus;
    use crate::resources::backup::list_backups;
    use crate::resources::test_helpers::MockExecutor;
    use std::fs;

    #[test]
    fn backs_up_existing_and_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        fs::create_dir(&home).unwrap();
        fs::write(home.join(".zshrc"), "old").unwrap();
        let toml = format!(
            "[[group]]\nname = \"zsh\"\ndest = '{0}'\nfiles = [[\"zshrc\", \".zshrc\"]]\n\n\
             [[group]]\nname = \"git\"\ndest = '{0}'\nfiles = [[\"gitconfig\", \".gitconfig\"]]\n",
            home.display()
        );
        let s = setup(dir.path(), &toml, "box", MockExecutor::new());

        run(&s, &GroupArgs::default()).unwrap();

        assert!(!home.join(".zshrc").exists());
        assert_eq!(list_backups(&home.join(".zshrc")).unwrap().len(), 1);
        let entries = s.log.group_entries();
        assert_eq!(entries[0].status, GroupStatus::Ok);
        assert_eq!(entries[0].message.as_deref(), Some("1 backup"));
        assert_eq!(entries[1].status, GroupStatus::Skipped);
    }
}
