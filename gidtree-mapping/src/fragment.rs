//! Per-profile git config fragments (`~/.gitconfig-<name>`).

use crate::error::{MappingError, Result};
use crate::layout::GitLayout;
use gidtree_config::Profile;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name prefix shared by every fragment; the suffix is the profile name.
pub const FRAGMENT_PREFIX: &str = ".gitconfig-";

/// Renders profiles into fragment files, overwriting any previous content.
#[derive(Debug, Clone)]
pub struct ConfigFragmentWriter {
    fragment_dir: PathBuf,
    ssh_program: String,
}

impl ConfigFragmentWriter {
    pub fn new(layout: &GitLayout) -> Self {
        Self {
            fragment_dir: layout.fragment_dir().to_path_buf(),
            ssh_program: layout.ssh_program().to_string(),
        }
    }

    /// Deterministic fragment location for a profile name.
    pub fn fragment_path_for(&self, name: &str) -> PathBuf {
        self.fragment_dir.join(format!("{FRAGMENT_PREFIX}{name}"))
    }

    /// Fragment text for a profile.
    pub fn render(&self, profile: &Profile) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[user]");
        let _ = writeln!(out, "    name = {}", profile.effective_author_name());
        let _ = writeln!(out, "    email = {}", profile.email);
        if let Some(key) = profile.signing_key() {
            let _ = writeln!(out, "    signingkey = {key}");
        }
        if let Some(key_path) = profile.ssh_key() {
            let _ = writeln!(out);
            let _ = writeln!(out, "[core]");
            let _ = writeln!(
                out,
                "    sshCommand = {} -i {key_path} -F /dev/null",
                self.ssh_program
            );
        }
        out
    }

    /// Write (or overwrite) the profile's fragment and return its path.
    pub fn write(&self, profile: &Profile) -> Result<PathBuf> {
        if profile.name.is_empty() {
            return Err(MappingError::InvalidProfile(
                "profile name is empty".to_string(),
            ));
        }
        if profile.email.is_empty() {
            return Err(MappingError::InvalidProfile(format!(
                "profile '{}' has no email",
                profile.name
            )));
        }

        let path = self.fragment_path_for(&profile.name);
        let fragment_err = |source: std::io::Error| MappingError::FragmentWrite {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.fragment_dir).map_err(fragment_err)?;
        std::fs::write(&path, self.render(profile)).map_err(fragment_err)?;

        log::info!("Wrote profile config for '{}' to {:?}", profile.name, path);
        Ok(path)
    }

    /// Delete a profile's fragment. Returns false when there was none.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let path = self.fragment_path_for(name);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed profile config {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(MappingError::FragmentWrite { path, source }),
        }
    }
}

/// Profile name encoded in a fragment path, or an empty string when the
/// file name does not carry the fragment prefix.
pub fn extract_profile_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix(FRAGMENT_PREFIX))
        .unwrap_or_default()
        .to_string()
}
