//! Storage utilities for profile persistence
//!
//! Profiles are stored in `~/.gidtree/profiles.yaml` as a YAML list.

use crate::error::{ConfigError, Result};
use crate::paths::PathNormalizer;
use crate::profile::Profile;
use std::path::{Path, PathBuf};

/// Name of the working directory under the home directory
pub const WORKING_DIR_NAME: &str = ".gidtree";

/// File name of the profiles list inside the working directory
pub const PROFILES_FILE_NAME: &str = "profiles.yaml";

/// `~/.gidtree`
pub fn working_dir(paths: &PathNormalizer) -> PathBuf {
    paths.home().join(WORKING_DIR_NAME)
}

/// `~/.gidtree/profiles.yaml`
pub fn profiles_path(paths: &PathNormalizer) -> PathBuf {
    working_dir(paths).join(PROFILES_FILE_NAME)
}

/// Load profiles from a specific file
pub fn load_profiles_from(path: &Path) -> Result<Vec<Profile>> {
    log::debug!("Loading profiles from {:?}", path);
    if !path.exists() {
        log::debug!("No profiles file at {:?}, starting with empty profiles", path);
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let profiles: Vec<Profile> =
        serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("Parsed {} profiles from {:?}", profiles.len(), path);
    Ok(profiles)
}

/// Save profiles to a specific file
pub fn save_profiles_to(profiles: &[Profile], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }

    let contents = serde_yaml_ng::to_string(profiles).map_err(ConfigError::Serialize)?;

    // Atomic save: write to temp file then rename to prevent corruption on crash
    let temp_path = path.with_extension("yaml.tmp");
    std::fs::write(&temp_path, contents).map_err(|e| ConfigError::io(&temp_path, e))?;
    std::fs::rename(&temp_path, path).map_err(|e| ConfigError::io(path, e))?;

    log::info!("Saved {} profiles to {:?}", profiles.len(), path);
    Ok(())
}

/// Create the working directory and an empty profiles file if missing.
///
/// Returns the working directory path.
pub fn init(paths: &PathNormalizer) -> Result<PathBuf> {
    let dir = working_dir(paths);
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::io(&dir, e))?;

    let profiles = profiles_path(paths);
    if !profiles.exists() {
        save_profiles_to(&[], &profiles)?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nonexistent.yaml");

        let profiles = load_profiles_from(&path).unwrap();
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_load_empty_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.yaml");
        std::fs::write(&path, "  \n").unwrap();

        let profiles = load_profiles_from(&path).unwrap();
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("profiles.yaml");

        let profiles = vec![
            Profile::new("work", "me@work.com")
                .author_name("Jane Doe")
                .ssh_key_path("~/.ssh/id_work")
                .gpg_key_id("ABCD1234"),
            Profile::new("personal", "me@home.org"),
        ];

        save_profiles_to(&profiles, &path).unwrap();
        let loaded = load_profiles_from(&path).unwrap();
        assert_eq!(loaded, profiles);
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("dir").join("profiles.yaml");

        save_profiles_to(&[], &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_load_corrupt_file_returns_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("corrupt.yaml");
        std::fs::write(&path, "not: valid: yaml: [[[").unwrap();

        let result = load_profiles_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_init_creates_working_dir_and_keeps_existing_profiles() {
        let temp = tempdir().unwrap();
        let paths = PathNormalizer::with_home(temp.path());

        let dir = init(&paths).unwrap();
        assert_eq!(dir, temp.path().join(".gidtree"));
        assert!(profiles_path(&paths).exists());

        save_profiles_to(&[Profile::new("work", "w@x.com")], &profiles_path(&paths)).unwrap();
        init(&paths).unwrap();
        assert_eq!(load_profiles_from(&profiles_path(&paths)).unwrap().len(), 1);
    }
}
