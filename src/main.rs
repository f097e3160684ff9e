//! `confit` command-line entry point.
use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use confit::cli::{Cli, Command};
use confit::commands::{self, CommandSetup};
use confit::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        let version = option_env!("CONFIT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        writeln!(std::io::stdout().lock(), "confit {version}")?;
        return Ok(());
    }

    init_subscriber(args.verbose, args.command.name());
    let log = Arc::new(Logger::new(args.command.name()));
    let setup = CommandSetup::init(&args.global, log)?;
    let verbose = args.verbose;

    match args.command {
        Command::Install(opts) => commands::install::run(&setup, &opts),
        Command::Backup(opts) => commands::backup::run(&setup, &opts),
        Command::Diff(opts) => commands::diff::run(&setup, &opts, verbose),
        Command::Sync(opts) => commands::sync::run(&setup, &opts),
        Command::Configure(opts) => commands::hooks::configure(&setup, &opts, verbose),
        Command::PostInstall(opts) => commands::hooks::post_install(&setup, &opts, verbose),
        Command::Check(opts) => commands::check::run(&setup, &opts),
        Command::Apply(opts) => commands::apply::run(&setup, &opts, verbose),
        Command::Groups(opts) => commands::groups::run(&setup, &opts, &mut std::io::stdout().lock()),
        Command::Version => Ok(()),
    }
}
