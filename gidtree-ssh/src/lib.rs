//! ssh-agent integration for gidtree.
//!
//! Loads and unloads the private key attached to a profile and suggests key
//! paths found in `~/.ssh`.

pub mod agent;
pub mod discovery;
pub mod error;

pub use agent::{
    KeyAgent, SshAgent, load_key_for_profile, parse_fingerprint, unload_key_for_profile,
};
pub use discovery::discover_private_keys;
pub use error::{AgentError, Result};
