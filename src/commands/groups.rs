//! `groups` subcommand.
use std::io::Write;

use anyhow::{Result, anyhow};

use super::CommandSetup;
use crate::cli::GroupsOpts;
use crate::group::ConfGroup;
use crate::resources::command::HookCommand;
use crate::resources::mapping::Mapping;

/// List the active groups, or describe one of them.
///
/// # Errors
///
/// Returns an error if the named group is not active on this host or the
/// output cannot be written.
pub fn run(setup: &CommandSetup, opts: &GroupsOpts, out: &mut impl Write) -> Result<()> {
    let active = setup.config.active_groups(&setup.host.name);
    match &opts.group {
        None => {
            let width = active.iter().map(|g| g.name.len()).max().unwrap_or(0);
            for group in active {
                writeln!(out, "{:<width$}  {}", group.name, group.dest.display())?;
            }
        }
        Some(name) => {
            let group = active
                .into_iter()
                .find(|g| g.name == *name)
                .ok_or_else(|| anyhow!("Group '{name}' not found."))?;
            describe(setup, group, out)?;
        }
    }
    Ok(())
}

fn describe(setup: &CommandSetup, group: &ConfGroup, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", group.name)?;
    writeln!(out, "  dest: {}", group.dest.display())?;
    if group.hosts.is_empty() {
        writeln!(out, "  hosts: all")?;
    } else {
        writeln!(out, "  hosts: {}", group.hosts.join(", "))?;
    }
    match group.max_backups {
        Some(n) => writeln!(out, "  max_backups: {n}")?,
        None => writeln!(out, "  max_backups: unlimited")?,
    }

    write_mappings(setup, group, "install_files", &group.install_files, out)?;
    match &group.sync_files {
        Some(mappings) => write_mappings(setup, group, "sync_files", mappings, out)?,
        None => writeln!(out, "  sync_files: same as install_files")?,
    }

    if !group.check_binaries.is_empty() {
        writeln!(out, "  check_binaries:")?;
        for check in &group.check_binaries {
            if check.description.is_empty() {
                writeln!(out, "    {}", check.binary)?;
            } else {
                writeln!(out, "    {} ({})", check.binary, check.description)?;
            }
        }
    }
    write_hooks("config_cmds", &group.config_cmds, out)?;
    write_hooks("post_install_cmds", &group.post_install_cmds, out)?;
    Ok(())
}

fn write_mappings(
    setup: &CommandSetup,
    group: &ConfGroup,
    label: &str,
    mappings: &[Mapping],
    out: &mut impl Write,
) -> Result<()> {
    if mappings.is_empty() {
        writeln!(out, "  {label}: none")?;
        return Ok(());
    }
    writeln!(out, "  {label}:")?;
    for mapping in mappings {
        let resolved = mapping.locate(&setup.config.repo, &group.dest);
        writeln!(
            out,
            "    {} -> {}",
            mapping.source.display(),
            resolved.destination.display()
        )?;
    }
    Ok(())
}

fn write_hooks(label: &str, hooks: &[HookCommand], out: &mut impl Write) -> Result<()> {
    if hooks.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {label}:")?;
    for hook in hooks {
        writeln!(out, "    [{}] {}", hook.workdir.display(), hook.command)?;
    }
    Ok(())
}
