//! File locations used by the mapping engine.

use crate::error::Result;
use gidtree_config::{PathNormalizer, Settings};
use std::path::{Path, PathBuf};

/// Where the shared git config and the profile fragments live.
#[derive(Debug, Clone)]
pub struct GitLayout {
    paths: PathNormalizer,
    git_config: PathBuf,
    fragment_dir: PathBuf,
    ssh_program: String,
}

impl GitLayout {
    /// Resolve the layout for the current user, honouring `~/.gidtree/config.yaml`.
    pub fn from_env() -> Result<Self> {
        let paths = PathNormalizer::from_env()?;
        let settings = Settings::load(&paths)?;
        Ok(Self::from_settings(paths, &settings))
    }

    pub fn from_settings(paths: PathNormalizer, settings: &Settings) -> Self {
        Self {
            git_config: settings.git_config_path(&paths),
            fragment_dir: settings.fragment_dir_path(&paths),
            ssh_program: settings.ssh_program.clone(),
            paths,
        }
    }

    /// Default layout rooted at `home`: `home/.gitconfig` and fragments in `home`.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self::from_settings(PathNormalizer::with_home(home), &Settings::default())
    }

    pub fn paths(&self) -> &PathNormalizer {
        &self.paths
    }

    pub fn git_config(&self) -> &Path {
        &self.git_config
    }

    pub fn fragment_dir(&self) -> &Path {
        &self.fragment_dir
    }

    pub fn ssh_program(&self) -> &str {
        &self.ssh_program
    }
}
