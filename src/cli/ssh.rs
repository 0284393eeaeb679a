//! `gidtree ssh ...` and `gidtree profile keys`.

use super::Context;
use anyhow::{Context as _, Result, bail};
use gidtree_config::Profile;
use gidtree_ssh::{discover_private_keys, load_key_for_profile, unload_key_for_profile};
use std::io::Write;

fn profile_with_key<'a>(ctx: &'a Context, name: &str) -> Result<&'a Profile> {
    let profile = ctx.profiles.get(name).context("profile not found")?;
    if profile.ssh_key().is_none() {
        bail!("profile '{name}' does not have an SSH key configured");
    }
    Ok(profile)
}

pub fn load(ctx: &Context, name: &str, out: &mut dyn Write) -> Result<()> {
    let profile = profile_with_key(ctx, name)?;
    load_key_for_profile(&*ctx.agent, profile).context("failed to load SSH key")?;
    writeln!(out, "✓ SSH key loaded for profile '{name}'")?;
    Ok(())
}

pub fn unload(ctx: &Context, name: &str, out: &mut dyn Write) -> Result<()> {
    let profile = profile_with_key(ctx, name)?;
    unload_key_for_profile(&*ctx.agent, profile).context("failed to unload SSH key")?;
    writeln!(out, "✓ SSH key unloaded for profile '{name}'")?;
    Ok(())
}

pub fn keys(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let keys = discover_private_keys(&ctx.ssh_dir());
    if keys.is_empty() {
        writeln!(out, "No SSH keys found in ~/.ssh")?;
        return Ok(());
    }
    for key in keys {
        writeln!(out, "{key}")?;
    }
    Ok(())
}
