//! Typed error types for gidtree-mapping.

use gidtree_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the directory-mapping engine.
///
/// An incomplete `includeIf` block (header without a path line) is not an
/// error: the parser skips it and the editor appends past it.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Path resolution or environment failure (e.g. no home directory).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The shared git config exists but could not be read.
    #[error("failed to read git config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shared git config could not be written.
    #[error("failed to write git config '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A profile fragment could not be written or removed.
    #[error("failed to write profile config '{}': {source}", path.display())]
    FragmentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory already belongs to another profile.
    #[error("directory '{directory}' is already mapped to profile '{profile}'")]
    Conflict { directory: String, profile: String },

    /// The profile lacks a field required to render its fragment.
    #[error("cannot render profile: {0}")]
    InvalidProfile(String),
}

impl MappingError {
    /// True when the failure came from the environment rather than the files.
    pub fn is_environment(&self) -> bool {
        matches!(self, MappingError::Config(ConfigError::Environment(_)))
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_failure_is_distinct() {
        let err: MappingError =
            ConfigError::Environment("could not determine the home directory".to_string()).into();
        assert!(matches!(err, MappingError::Config(_)));
        assert!(err.is_environment());
        assert_eq!(
            err.to_string(),
            "environment error: could not determine the home directory"
        );
    }

    #[test]
    fn test_file_failures_are_not_environment() {
        let err = MappingError::Read {
            path: PathBuf::from("/gidtree-err/.gitconfig"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!err.is_environment());
        assert!(
            !MappingError::Conflict {
                directory: "/gidtree-err/a/".to_string(),
                profile: "work".to_string(),
            }
            .is_environment()
        );
    }
}
