//! `gidtree map`, `unmap`, `status` and `activate`.

use super::Context;
use anyhow::{Context as _, Result};
use gidtree_ssh::load_key_for_profile;
use std::io::Write;

pub fn map(ctx: &Context, profile_name: &str, directory: &str, out: &mut dyn Write) -> Result<()> {
    let profile = ctx.profiles.get(profile_name).context("profile not found")?;
    let mapping = ctx
        .mappings
        .map(profile, directory)
        .context("failed to map profile")?;
    log::debug!("Fragment for '{}' at {:?}", profile_name, mapping.fragment_path);

    writeln!(
        out,
        "✓ Profile '{profile_name}' mapped to directory '{}'",
        ctx.paths.contract_home_str(&mapping.directory)
    )?;
    Ok(())
}

pub fn unmap(ctx: &Context, directory: &str, out: &mut dyn Write) -> Result<()> {
    let removed = ctx
        .mappings
        .unmap(directory)
        .context("failed to unmap directory")?;
    if removed {
        writeln!(out, "✓ Directory '{directory}' unmapped successfully")?;
    } else {
        writeln!(out, "Directory '{directory}' was not mapped")?;
    }
    Ok(())
}

/// Plain-text overview: current directory, active profile, every mapping,
/// and whether the shared git config exists.
pub fn status(ctx: &Context, cwd: &str, out: &mut dyn Write) -> Result<()> {
    let mappings = ctx.mappings.mappings().context("failed to read mappings")?;
    let active = ctx
        .mappings
        .lookup(cwd)
        .context("failed to look up current directory")?;

    writeln!(out, "gidtree status")?;
    writeln!(out)?;
    writeln!(out, "Current Directory")?;
    writeln!(out, "  Path: {}", ctx.paths.contract_home_str(cwd))?;
    writeln!(out)?;

    match active.as_ref().map(|m| (m, ctx.profiles.get(&m.profile))) {
        Some((_, Ok(profile))) => {
            writeln!(out, "✓ Active Profile: {}", profile.name)?;
            writeln!(out, "  Email: {}", profile.email)?;
            if let Some(key) = profile.ssh_key() {
                writeln!(out, "  SSH Key: {key}")?;
            }
            if let Some(key) = profile.signing_key() {
                writeln!(out, "  GPG Key: {key}")?;
            }
        }
        Some((mapping, Err(_))) => {
            writeln!(
                out,
                "✗ Mapped to unknown profile '{}' ({})",
                mapping.profile,
                mapping.fragment_path.display()
            )?;
        }
        None => writeln!(out, "No active profile for current directory")?,
    }
    writeln!(out)?;

    writeln!(out, "Directory Mappings")?;
    if mappings.is_empty() {
        writeln!(out, "  No directory mappings found.")?;
    } else {
        for m in &mappings {
            let profile = if m.profile.is_empty() {
                m.fragment_path.display().to_string()
            } else {
                m.profile.clone()
            };
            writeln!(
                out,
                "  {} → {}",
                ctx.paths.contract_home_str(&m.directory),
                profile
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Git Config")?;
    let config_path = ctx.mappings.config_path();
    if config_path.exists() {
        writeln!(out, "  ✓ Main config: {}", config_path.display())?;
    } else {
        writeln!(out, "  ✗ Main config not found: {}", config_path.display())?;
    }
    Ok(())
}

/// Report the profile for `cwd` and load its SSH key.
pub fn activate(ctx: &Context, cwd: &str, out: &mut dyn Write) -> Result<()> {
    let Some(mapping) = ctx.mappings.lookup(cwd).context("failed to get mapping")? else {
        writeln!(out, "No profile mapped for current directory")?;
        return Ok(());
    };

    let profile = ctx
        .profiles
        .get(&mapping.profile)
        .context("profile not found")?;
    writeln!(out, "Active profile: {}", profile.name)?;
    writeln!(out, "Email: {}", profile.email)?;

    if profile.ssh_key().is_some() {
        load_key_for_profile(&*ctx.agent, profile).context("failed to load SSH key")?;
        writeln!(out, "✓ SSH key loaded")?;
    }
    Ok(())
}
