//! Error type for ssh-agent operations.

use gidtree_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Home or working directory could not be resolved.
    #[error(transparent)]
    Environment(#[from] ConfigError),

    #[error("SSH key does not exist: {}", .0.display())]
    KeyNotFound(PathBuf),

    /// The helper program could not be started at all.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper program ran and exited unsuccessfully.
    #[error("'{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("unexpected fingerprint output: {0:?}")]
    UnexpectedFingerprint(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
