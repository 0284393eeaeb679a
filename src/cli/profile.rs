//! `gidtree profile ...` commands.

use super::Context;
use anyhow::{Context as _, Result};
use gidtree_config::Profile;
use std::io::{BufRead, Write};

/// Requested change to an optional profile field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldChange {
    #[default]
    Keep,
    Set(String),
    Clear,
}

impl FieldChange {
    pub fn from_flags(value: Option<String>, clear: bool) -> Self {
        match (value, clear) {
            (_, true) => FieldChange::Clear,
            (Some(v), false) => FieldChange::Set(v),
            (None, false) => FieldChange::Keep,
        }
    }

    fn apply(self, field: &mut Option<String>) {
        match self {
            FieldChange::Keep => {}
            FieldChange::Set(v) => *field = Some(v),
            FieldChange::Clear => *field = None,
        }
    }
}

/// Field updates for `profile update`.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub author_name: FieldChange,
    pub ssh_key_path: FieldChange,
    pub gpg_key_id: FieldChange,
}

impl ProfileChanges {
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(email) = self.email {
            profile.email = email;
        }
        self.author_name.apply(&mut profile.author_name);
        self.ssh_key_path.apply(&mut profile.ssh_key_path);
        self.gpg_key_id.apply(&mut profile.gpg_key_id);
    }
}

pub fn create(ctx: &mut Context, profile: Profile, out: &mut dyn Write) -> Result<()> {
    let name = profile.name.clone();
    ctx.profiles
        .add(profile)
        .context("failed to save profile")?;
    writeln!(out, "✓ Profile '{name}' created successfully")?;
    Ok(())
}

pub fn list(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let profiles = ctx.profiles.list();
    if profiles.is_empty() {
        writeln!(
            out,
            "No profiles found. Create one with 'gidtree profile create'."
        )?;
        return Ok(());
    }

    let name_width = column_width("NAME", profiles.iter().map(|p| p.name.as_str()));
    let email_width = column_width("EMAIL", profiles.iter().map(|p| p.email.as_str()));
    let author_width = column_width(
        "AUTHOR",
        profiles.iter().map(|p| p.effective_author_name()),
    );

    writeln!(
        out,
        "{:<name_width$}  {:<email_width$}  {:<author_width$}  SSH KEY",
        "NAME", "EMAIL", "AUTHOR"
    )?;
    for p in profiles {
        writeln!(
            out,
            "{:<name_width$}  {:<email_width$}  {:<author_width$}  {}",
            p.name,
            p.email,
            p.effective_author_name(),
            p.ssh_key().unwrap_or("-")
        )?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Apply `changes` to profile `name` and refresh its fragment when mapped.
pub fn update(
    ctx: &mut Context,
    name: &str,
    changes: ProfileChanges,
    out: &mut dyn Write,
) -> Result<()> {
    let mut updated = ctx
        .profiles
        .get(name)
        .context("profile not found")?
        .clone();
    changes.apply_to(&mut updated);

    ctx.profiles
        .update(name, updated.clone())
        .context("failed to save profile")?;

    if ctx
        .mappings
        .refresh_profile(&updated)
        .context("failed to refresh profile config")?
        .is_some()
    {
        log::info!("Refreshed fragment for mapped profile '{}'", name);
    }

    writeln!(out, "✓ Profile '{name}' updated successfully")?;
    Ok(())
}

/// Delete a profile, unmapping its directories after confirmation.
pub fn delete(
    ctx: &mut Context,
    name: &str,
    assume_yes: bool,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    ctx.profiles.get(name).context("profile not found")?;

    let directories = ctx
        .mappings
        .directories_for_profile(name)
        .context("failed to check profile mappings")?;

    if !directories.is_empty() {
        writeln!(
            out,
            "Profile '{name}' is mapped to the following directories:"
        )?;
        for dir in &directories {
            writeln!(out, "  - {}", ctx.paths.contract_home_str(dir))?;
        }

        if !assume_yes {
            write!(
                out,
                "\nDo you want to unmap all directories and delete the profile? (y/N): "
            )?;
            out.flush()?;
            if !confirmed(input)? {
                writeln!(out, "Delete cancelled.")?;
                return Ok(());
            }
        }

        writeln!(out, "\nUnmapping directories...")?;
        for dir in &directories {
            ctx.mappings
                .unmap(dir)
                .with_context(|| format!("failed to unmap directory '{dir}'"))?;
            writeln!(out, "  ✓ Unmapped: {}", ctx.paths.contract_home_str(dir))?;
        }
    }

    let still_mapped = ctx
        .mappings
        .is_profile_mapped(name)
        .context("failed to check profile mappings")?;
    ctx.profiles
        .delete(name, |_| Ok(still_mapped))
        .context("failed to delete profile")?;

    if let Err(e) = ctx.mappings.remove_fragment(name) {
        log::warn!("Could not remove profile config for '{}': {}", name, e);
    }

    writeln!(out, "\n✓ Profile '{name}' deleted successfully")?;
    Ok(())
}

fn confirmed(input: &mut dyn BufRead) -> Result<bool> {
    let mut response = String::new();
    input
        .read_line(&mut response)
        .context("failed to read input")?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
