#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for config discovery, loading and validation.

mod common;

use std::path::PathBuf;

use common::TestContextBuilder;
use confit::config::{self, Config};
use confit::error::ConfigError;

#[test]
fn tilde_destinations_expand_to_home() {
    let ctx = TestContextBuilder::new()
        .with_config(
            r#"
[[group]]
name = "zsh"
dest = "~/.config"
hosts = ["box", "laptop"]
install_files = [["zshrc", "zsh/.zshrc"]]
"#,
        )
        .build();

    let cfg = ctx.load_config();

    assert_eq!(cfg.groups[0].dest, ctx.home().join(".config"));
    assert_eq!(cfg.groups[0].hosts, vec!["box", "laptop"]);
    assert_eq!(
        cfg.groups[0].destinations(&cfg.repo),
        vec![ctx.home().join(".config/zsh/.zshrc")]
    );
}

#[test]
fn repo_key_moves_the_source_root() {
    let ctx = TestContextBuilder::new()
        .with_config("repo = \"dotfiles\"\n")
        .build();

    let cfg = ctx.load_config();

    assert_eq!(
        cfg.repo,
        dunce::canonicalize(ctx.repo()).unwrap().join("dotfiles")
    );
}

#[test]
fn unknown_keys_are_parse_errors() {
    let ctx = TestContextBuilder::new()
        .with_config("[[group]]\nname = \"g\"\ndest = \"~\"\nfiels = []\n")
        .build();

    let err = Config::load(&ctx.config_path(), Some(&ctx.home())).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
}

#[test]
fn missing_source_produces_a_warning() {
    let ctx = TestContextBuilder::new()
        .with_config("[[group]]\nname = \"g\"\ndest = \"~\"\nfiles = [[\"nope\", \"x\"]]\n")
        .build();

    let warnings = ctx.load_config().warnings("box");

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].group, "g");
    assert!(warnings[0].message.starts_with("source does not exist"));
}

#[test]
fn explicit_config_path_is_used() {
    let ctx = TestContextBuilder::new().with_config("").build();

    let found = config::discover(Some(&ctx.config_path())).unwrap();

    assert_eq!(found, ctx.config_path());
}

#[test]
fn not_found_lists_searched_paths() {
    let missing = PathBuf::from("/nonexistent/confit.toml");
    let err = config::discover(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/confit.toml"));
}
