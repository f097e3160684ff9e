//! Configuration group sync engine.
//!
//! A configuration group maps files and directories in a repository onto a
//! destination root (usually the home directory) and carries the commands
//! and binaries that go with them. Groups are declared in `confit.toml` and
//! may be restricted to particular hosts.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: find, parse and validate the TOML config file
//! - **[`resources`]**: copy, backup, diff and hook primitives
//! - **[`group`]**: the per-group operations built from those primitives
//! - **[`commands`]**: subcommand orchestration over the selected groups
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod group;
pub mod logging;
pub mod platform;
pub mod resources;
