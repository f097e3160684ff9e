//! Command-line definition.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for confit.
#[derive(Parser, Debug)]
#[command(
    name = "confit",
    about = "Keep per-host configuration groups in sync between a repository and their destinations",
    version = option_env!("CONFIT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION")),
    arg_required_else_help = true
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file to use instead of searching the default locations
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Host name used for group filtering instead of the detected one
    #[arg(long, global = true, value_name = "NAME")]
    pub host: Option<String>,
}

/// Group selection shared by the per-group subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GroupArgs {
    /// Groups to process (default: every active group)
    #[arg(value_name = "GROUP")]
    pub groups: Vec<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy group files from the repository into their destinations
    Install(InstallOpts),
    /// Move existing destination files to timestamped backups
    Backup(GroupArgs),
    /// Show whether destinations differ from the repository
    Diff(GroupArgs),
    /// Copy destination files back into the repository
    Sync(GroupArgs),
    /// Run each group's configure commands
    Configure(GroupArgs),
    /// Run each group's post-install commands
    PostInstall(GroupArgs),
    /// Check that each group's required binaries are on PATH
    Check(GroupArgs),
    /// Back up, install and post-install every group that differs
    Apply(GroupArgs),
    /// List active groups, or show one group in detail
    Groups(GroupsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Backup(_) => "backup",
            Self::Diff(_) => "diff",
            Self::Sync(_) => "sync",
            Self::Configure(_) => "configure",
            Self::PostInstall(_) => "post-install",
            Self::Check(_) => "check",
            Self::Apply(_) => "apply",
            Self::Groups(_) => "groups",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Overwrite existing destinations
    #[arg(short, long)]
    pub force: bool,

    /// Group selection.
    #[command(flatten)]
    pub groups: GroupArgs,
}

/// Options for the `groups` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GroupsOpts {
    /// Group to show in detail
    #[arg(value_name = "GROUP")]
    pub group: Option<String>,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_an_error() {
        assert!(Cli::try_parse_from(["confit"]).is_err());
    }

    #[test]
    fn parse_install_force_with_groups() {
        let cli = Cli::parse_from(["confit", "install", "-f", "vim", "zsh"]);
        assert!(matches!(&cli.command, Command::Install(_)), "expected install");
        if let Command::Install(opts) = cli.command {
            assert!(opts.force);
            assert_eq!(opts.groups.groups, vec!["vim", "zsh"]);
        }
    }

    #[test]
    fn parse_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "confit", "diff", "--config", "/tmp/c.toml", "--host", "laptop", "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.global.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.global.host.as_deref(), Some("laptop"));
        assert!(matches!(cli.command, Command::Diff(_)));
    }

    #[test]
    fn parse_post_install_is_kebab_case() {
        let cli = Cli::parse_from(["confit", "post-install"]);
        assert_eq!(cli.command.name(), "post-install");
    }

    #[test]
    fn parse_groups_with_name() {
        let cli = Cli::parse_from(["confit", "groups", "vim"]);
        assert!(matches!(&cli.command, Command::Groups(_)), "expected groups");
        if let Command::Groups(opts) = cli.command {
            assert_eq!(opts.group.as_deref(), Some("vim"));
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["confit", "uninstall"]).is_err());
    }
}
