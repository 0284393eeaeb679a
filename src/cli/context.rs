//! Everything a command needs, resolved once per invocation.

use anyhow::{Context as _, Result};
use gidtree_config::{PathNormalizer, ProfileManager, Settings};
use gidtree_mapping::{GitLayout, MappingService};
use gidtree_ssh::{KeyAgent, SshAgent};
use std::path::PathBuf;

pub struct Context {
    pub paths: PathNormalizer,
    pub settings: Settings,
    pub profiles: ProfileManager,
    pub mappings: MappingService,
    pub agent: Box<dyn KeyAgent>,
}

impl Context {
    /// Context rooted at an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Result<Self> {
        Self::with_paths(PathNormalizer::with_home(home))
    }

    /// Load settings and profiles for the home directory behind `paths`.
    pub fn with_paths(paths: PathNormalizer) -> Result<Self> {
        let settings = Settings::load(&paths).context("failed to load settings")?;
        let layout = GitLayout::from_settings(paths.clone(), &settings);
        let profiles =
            ProfileManager::load(&paths).context("failed to initialize profile manager")?;

        Ok(Self {
            mappings: MappingService::new(&layout),
            agent: Box::new(SshAgent::new(paths.clone())),
            paths,
            settings,
            profiles,
        })
    }

    /// Swap the key agent, e.g. for one that does not touch the real ssh-agent.
    pub fn with_agent(mut self, agent: Box<dyn KeyAgent>) -> Self {
        self.agent = agent;
        self
    }

    pub fn ssh_dir(&self) -> PathBuf {
        self.paths.home().join(".ssh")
    }
}
