//! Tool settings loaded from `~/.gidtree/config.yaml`.
//!
//! The file is optional and every field has a default, so a fresh install
//! behaves like the classic layout: `~/.gitconfig` plus `~/.gitconfig-<name>`
//! fragments.

use crate::error::{ConfigError, Result};
use crate::paths::PathNormalizer;
use crate::storage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the settings file inside the working directory
pub const SETTINGS_FILE_NAME: &str = "config.yaml";

/// Log verbosity for the debug log.
///
/// `RUST_LOG` and the `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shared git configuration file that receives the includeIf blocks.
    /// Defaults to `~/.gitconfig`.
    pub git_config: Option<String>,

    /// Directory holding the per-profile fragments. Defaults to `~`.
    pub fragment_dir: Option<String>,

    /// Program named in the generated `core.sshCommand`
    pub ssh_program: String,

    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            git_config: None,
            fragment_dir: None,
            ssh_program: "ssh".to_string(),
            log_level: LogLevel::Off,
        }
    }
}

impl Settings {
    /// `~/.gidtree/config.yaml`
    pub fn settings_path(paths: &PathNormalizer) -> PathBuf {
        storage::working_dir(paths).join(SETTINGS_FILE_NAME)
    }

    /// Load settings from the default location, falling back to defaults
    /// when the file does not exist.
    pub fn load(paths: &PathNormalizer) -> Result<Self> {
        Self::load_from(&Self::settings_path(paths))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings =
            serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded settings from {:?}: {:?}", path, settings);
        Ok(settings)
    }

    /// Resolved shared git config path
    pub fn git_config_path(&self, paths: &PathNormalizer) -> PathBuf {
        match self.git_config.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => paths.expand_tilde(p),
            None => paths.home().join(".gitconfig"),
        }
    }

    /// Resolved fragment directory
    pub fn fragment_dir_path(&self, paths: &PathNormalizer) -> PathBuf {
        match self.fragment_dir.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => paths.expand_tilde(p),
            None => paths.home().to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_missing() {
        let temp = tempdir().unwrap();
        let paths = PathNormalizer::with_home(temp.path());
        let settings = Settings::load(&paths).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            settings.git_config_path(&paths),
            temp.path().join(".gitconfig")
        );
        assert_eq!(settings.fragment_dir_path(&paths), temp.path());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "git_config: ~/dotfiles/gitconfig\nlog_level: debug\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.ssh_program, "ssh");
        assert_eq!(settings.log_level, LogLevel::Debug);

        let paths = PathNormalizer::with_home("/home/tester");
        assert_eq!(
            settings.git_config_path(&paths),
            PathBuf::from("/home/tester/dotfiles/gitconfig")
        );
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "log_level: [loud").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Off.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }
}
