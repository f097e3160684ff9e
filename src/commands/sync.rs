//! `sync` subcommand.
use anyhow::Result;

use super::{CommandSetup, Outcome, for_each_group, plural};
use crate::cli::GroupArgs;

/// Copy each selected group's destination files back into the repository.
///
/// # Errors
///
/// Returns an error if a group name is unknown or any group failed.
pub fn run(setup: &CommandSetup, args: &GroupArgs) -> Result<()> {
    for_each_group(setup, &args.groups, "Synchronizing", |group| {
        match group.synchronize(&setup.ctx)? {
            0 => Ok(Outcome::skipped("nothing present")),
            n => Ok(Outcome::ok(plural(n, "mapping"))),
        }
    })
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::setup;
    use crate::logging::GroupStatus;
    use crate::resources::test_helpers::MockExecutor;
    use std::fs;

    #[test]
    fn copies_destination_back_using_sync_files() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        fs::create_dir(&home).unwrap();
        fs::write(dir.path().join("init.vim"), "old").unwrap();
        fs::write(home.join("init.vim"), "edited").unwrap();
        fs::write(home.join("session.vim"), "state").unwrap();
        let toml = format!(
            "[[group]]\nname = \"nvim\"\ndest = '{}'\n\
             files = [[\"init.vim\", \"init.vim\"], [\"session.vim\", \"session.vim\"]]\n\
             sync_files = [[\"init.vim\", \"init.vim\"]]\n",
            home.display()
        );
        let s = setup(dir.path(), &toml, "box", MockExecutor::new());

        run(&s, &GroupArgs::default()).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("init.vim")).unwrap(), "edited");
        assert!(!dir.path().join("session.vim").exists());
        assert_eq!(s.log.group_entries()[0].message.as_deref(), Some("1 mapping"));
    }

    #[test]
    fn missing_destination_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        fs::create_dir(&home).unwrap();
        let toml = format!(
            "[[group]]\nname = \"g\"\ndest = '{}'\nfiles = [[\"x\", \"x\"]]\n",
            home.display()
        );
        let s = setup(dir.path(), &toml, "box", MockExecutor::new());

        run(&s, &GroupArgs::default()).unwrap();

        assert_eq!(s.log.group_entries()[0].status, GroupStatus::Skipped);
    }
}
