//! Configuration layer for gidtree.
//!
//! This crate provides:
//!
//! - Path normalization (home lookup, tilde expansion, symlink resolution)
//! - The `Profile` model and its YAML storage in `~/.gidtree/profiles.yaml`
//! - `ProfileManager` for validated CRUD on the stored profiles
//! - Tool `Settings` from `~/.gidtree/config.yaml`

pub mod error;
pub mod manager;
pub mod paths;
pub mod profile;
pub mod settings;
pub mod storage;

pub use error::{ConfigError, Result};
pub use manager::{ProfileManager, validate_name};
pub use paths::{PathNormalizer, clean_path, with_trailing_slash};
pub use profile::Profile;
pub use settings::{LogLevel, Settings};
