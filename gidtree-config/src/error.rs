//! Typed error variants for the gidtree-config crate.
//!
//! Callers at the crate boundary can match on specific failure modes
//! (missing profile, duplicate name, unresolvable home directory) instead of
//! relying on opaque `anyhow` strings.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving paths or loading/saving profiles and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A prerequisite of the environment is missing, such as the home directory.
    #[error("environment error: {0}")]
    Environment(String),

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A YAML file could not be parsed.
    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Profiles or settings could not be serialized.
    #[error("failed to serialize: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    /// A field value failed validation. The string names the field and the reason.
    #[error("invalid profile: {0}")]
    Validation(String),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("profile '{0}' already exists")]
    DuplicateProfile(String),

    /// The profile is still referenced by one or more directory mappings.
    #[error("profile '{0}' is mapped to one or more directories. Please unmap it first")]
    ProfileMapped(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
