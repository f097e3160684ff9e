#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the per-group commands.
//!
//! Each test builds a real repository and home directory, loads the config
//! through the public loader, and drives the commands end to end with the
//! native copy strategy.

mod common;

use std::time::{Duration, SystemTime};

use common::TestContextBuilder;
use confit::cli::{GroupArgs, InstallOpts};
use confit::commands;
use confit::logging::GroupStatus;
use confit::resources::backup::list_backups;
use filetime::{FileTime, set_file_mtime};

const VIM: &str = r#"
[[group]]
name = "vim"
dest = "~"
files = [["vimrc", ".vimrc"], ["vim", ".vim"]]
max_backups = 2
"#;

fn all() -> GroupArgs {
    GroupArgs::default()
}

fn pin_mtime(path: &std::path::Path, offset: u64) {
    let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset);
    set_file_mtime(path, FileTime::from_system_time(at)).unwrap();
}

// ---------------------------------------------------------------------------
// install / diff / sync round trip
// ---------------------------------------------------------------------------

#[test]
fn install_then_diff_reports_in_sync() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("vimrc", "set number\n")
        .with_repo_file("vim/colors/dark.vim", "hi Normal\n")
        .with_config(VIM)
        .build();

    commands::install::run(&ctx.setup("box"), &InstallOpts::default()).unwrap();
    assert_eq!(ctx.read_home(".vimrc"), "set number\n");
    assert_eq!(ctx.read_home(".vim/colors/dark.vim"), "hi Normal\n");

    let setup = ctx.setup("box");
    commands::diff::run(&setup, &all(), false).unwrap();
    assert_eq!(setup.log.group_entries()[0].status, GroupStatus::Skipped);
}

#[test]
fn local_edit_is_reported_and_synced_back() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("vimrc", "set number\n")
        .with_repo_file("vim/plugin/a.vim", "a\n")
        .with_config(VIM)
        .build();
    commands::install::run(&ctx.setup("box"), &InstallOpts::default()).unwrap();

    ctx.write_home(".vim/plugin/b.vim", "b\n");
    let setup = ctx.setup("box");
    commands::diff::run(&setup, &all(), true).unwrap();
    assert_eq!(setup.log.group_entries()[0].status, GroupStatus::Ok);

    commands::sync::run(&ctx.setup("box"), &all()).unwrap();
    assert_eq!(ctx.read_repo("vim/plugin/b.vim"), "b\n");
    assert_eq!(ctx.read_repo("vim/plugin/a.vim"), "a\n");

    let setup = ctx.setup("box");
    commands::diff::run(&setup, &all(), false).unwrap();
    assert_eq!(setup.log.group_entries()[0].status, GroupStatus::Skipped);
}

#[test]
fn install_without_force_leaves_existing_files_alone() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("vimrc", "repo\n")
        .with_repo_file("vim/a.vim", "a\n")
        .with_home_file(".vimrc", "mine\n")
        .with_config(VIM)
        .build();

    let err = commands::install::run(&ctx.setup("box"), &InstallOpts::default()).unwrap_err();

    assert_eq!(err.to_string(), "1 group(s) failed");
    assert_eq!(ctx.read_home(".vimrc"), "mine\n");
    assert!(!ctx.home().join(".vim").exists());
}

// ---------------------------------------------------------------------------
// backup / apply
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn repeated_backups_keep_only_max_backups() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("vimrc", "repo\n")
        .with_repo_file("vim/a.vim", "a\n")
        .with_config(VIM)
        .build();
    let target = ctx.home().join(".vimrc");

    for round in 0..3 {
        ctx.write_home(".vimrc", &format!("round {round}\n"));
        pin_mtime(&target, round * 60);
        commands::backup::run(&ctx.setup("box"), &all()).unwrap();
    }

    let kept = list_backups(&target).unwrap();
    assert_eq!(kept.len(), 2);
    assert_eq!(std::fs::read_to_string(&kept[0]).unwrap(), "round 1\n");
    assert_eq!(std::fs::read_to_string(&kept[1]).unwrap(), "round 2\n");
}

#[cfg(unix)]
#[test]
fn apply_backs_up_installs_and_runs_post_install() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("vimrc", "repo\n")
        .with_repo_file("vim/a.vim", "a\n")
        .with_home_file(".vimrc", "local\n")
        .with_config(&format!(
            "{VIM}post_install_cmds = [[\"touch applied\", \".vim\"]]\n"
        ))
        .build();

    let setup = ctx.setup("box");
    commands::apply::run(&setup, &all(), false).unwrap();

    assert_eq!(ctx.read_home(".vimrc"), "repo\n");
    assert_eq!(list_backups(&ctx.home().join(".vimrc")).unwrap().len(), 1);
    assert!(ctx.home().join(".vim/applied").is_file());
    assert_eq!(
        setup.log.group_entries()[0].message.as_deref(),
        Some("applied, 1 backup")
    );
}

// ---------------------------------------------------------------------------
// hooks and host filtering
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn configure_stops_at_first_failing_command() {
    let ctx = TestContextBuilder::new()
        .with_config(
            r#"
[[group]]
name = "broken"
dest = "~"
config_cmds = ["touch first", "exit 3", "touch never"]

[[group]]
name = "fine"
dest = "~"
config_cmds = ["touch fine"]
"#,
        )
        .build();

    let setup = ctx.setup("box");
    let err = commands::hooks::configure(&setup, &all(), false).unwrap_err();

    assert_eq!(err.to_string(), "1 group(s) failed");
    assert!(ctx.home().join("first").exists());
    assert!(!ctx.home().join("never").exists());
    assert!(ctx.home().join("fine").exists());
    let entries = setup.log.group_entries();
    assert_eq!(entries[0].status, GroupStatus::Failed);
    assert_eq!(entries[1].status, GroupStatus::Ok);
}

#[test]
fn groups_for_other_hosts_are_not_touched() {
    let ctx = TestContextBuilder::new()
        .with_repo_file("work.conf", "work\n")
        .with_config(
            r#"
[[group]]
name = "work"
dest = "~"
host = "office"
files = [["work.conf", ".work.conf"]]
"#,
        )
        .build();

    commands::install::run(&ctx.setup("box"), &InstallOpts::default()).unwrap();
    assert!(!ctx.home().join(".work.conf").exists());

    let named = InstallOpts {
        force: false,
        groups: GroupArgs {
            groups: vec!["work".into()],
        },
    };
    let err = commands::install::run(&ctx.setup("box"), &named).unwrap_err();
    assert_eq!(err.to_string(), "Group 'work' not found.");

    commands::install::run(&ctx.setup("office"), &named).unwrap();
    assert_eq!(ctx.read_home(".work.conf"), "work\n");
}
