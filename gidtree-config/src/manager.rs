//! Profile collection management.
//!
//! `ProfileManager` owns the in-memory profile list, enforces unique and
//! filesystem-safe names, and writes every mutation straight back to disk.

use crate::error::{ConfigError, Result};
use crate::paths::PathNormalizer;
use crate::profile::Profile;
use crate::storage;
use std::path::{Path, PathBuf};

/// Manages the persisted list of profiles
#[derive(Debug, Clone)]
pub struct ProfileManager {
    path: PathBuf,
    paths: PathNormalizer,
    profiles: Vec<Profile>,
}

impl ProfileManager {
    /// Load profiles from `~/.gidtree/profiles.yaml`
    pub fn load(paths: &PathNormalizer) -> Result<Self> {
        Self::load_from(storage::profiles_path(paths), paths.clone())
    }

    /// Load profiles from a specific file
    pub fn load_from(path: PathBuf, paths: PathNormalizer) -> Result<Self> {
        let profiles = storage::load_profiles_from(&path)?;
        Ok(Self {
            path,
            paths,
            profiles,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// All profiles in stored order
    pub fn list(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Add a new profile and persist
    pub fn add(&mut self, profile: Profile) -> Result<()> {
        if self.profiles.iter().any(|p| p.name == profile.name) {
            return Err(ConfigError::DuplicateProfile(profile.name));
        }
        self.validate(&profile)?;

        log::info!("Adding profile '{}'", profile.name);
        self.profiles.push(profile);
        self.save()
    }

    /// Replace the profile called `name` and persist.
    ///
    /// The replacement may carry a different name as long as no other
    /// profile already uses it.
    pub fn update(&mut self, name: &str, profile: Profile) -> Result<()> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        if profile.name != name && self.profiles.iter().any(|p| p.name == profile.name) {
            return Err(ConfigError::DuplicateProfile(profile.name));
        }
        self.validate(&profile)?;

        log::info!("Updating profile '{}'", name);
        self.profiles[index] = profile;
        self.save()
    }

    /// Remove a profile by name.
    ///
    /// `is_mapped` reports whether the profile is still referenced by a
    /// directory mapping; mapped profiles are refused.
    pub fn delete<F>(&mut self, name: &str, is_mapped: F) -> Result<Profile>
    where
        F: FnOnce(&str) -> Result<bool>,
    {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        if is_mapped(name)? {
            return Err(ConfigError::ProfileMapped(name.to_string()));
        }

        log::info!("Deleting profile '{}'", name);
        let removed = self.profiles.remove(index);
        self.save()?;
        Ok(removed)
    }

    fn validate(&self, profile: &Profile) -> Result<()> {
        validate_name(&profile.name)?;
        if profile.email.trim().is_empty() {
            return Err(ConfigError::Validation("email must not be empty".to_string()));
        }
        if let Some(key) = profile.ssh_key() {
            let expanded = self.paths.expand_tilde(key);
            if !expanded.exists() {
                return Err(ConfigError::Validation(format!(
                    "SSH key path does not exist: {key}"
                )));
            }
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        storage::save_profiles_to(&self.profiles, &self.path)
    }
}

/// Check that a profile name can safely be used as a file name suffix.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigError::Validation("name must not be empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(ConfigError::Validation(format!("'{name}' is not a valid name")));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| matches!(c, '/' | '\\' | '\0') || c.is_whitespace())
    {
        return Err(ConfigError::Validation(format!(
            "name '{name}' contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    fn manager() -> (ProfileManager, TempDir) {
        let temp = tempdir().unwrap();
        let paths = PathNormalizer::with_home(temp.path());
        let manager = ProfileManager::load(&paths).unwrap();
        (manager, temp)
    }

    #[test]
    fn test_add_and_get() {
        let (mut manager, temp) = manager();
        manager.add(Profile::new("work", "me@work.com")).unwrap();

        assert_eq!(manager.get("work").unwrap().email, "me@work.com");
        assert!(matches!(
            manager.get("missing"),
            Err(ConfigError::ProfileNotFound(_))
        ));

        let paths = PathNormalizer::with_home(temp.path());
        let reloaded = ProfileManager::load(&paths).unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let (mut manager, _temp) = manager();
        manager.add(Profile::new("work", "a@work.com")).unwrap();
        let result = manager.add(Profile::new("work", "b@work.com"));
        assert!(matches!(result, Err(ConfigError::DuplicateProfile(n)) if n == "work"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_add_validates_name_and_email() {
        let (mut manager, _temp) = manager();
        for bad in ["", "..", "a/b", "a b"] {
            assert!(matches!(
                manager.add(Profile::new(bad, "x@y.z")),
                Err(ConfigError::Validation(_))
            ));
        }
        assert!(matches!(
            manager.add(Profile::new("ok", " ")),
            Err(ConfigError::Validation(_))
        ));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_add_checks_ssh_key_exists() {
        let (mut manager, temp) = manager();
        let missing = Profile::new("work", "me@work.com").ssh_key_path("~/.ssh/id_missing");
        assert!(matches!(manager.add(missing), Err(ConfigError::Validation(_))));

        let ssh_dir = temp.path().join(".ssh");
        std::fs::create_dir_all(&ssh_dir).unwrap();
        std::fs::write(ssh_dir.join("id_work"), "key").unwrap();
        let present = Profile::new("work", "me@work.com").ssh_key_path("~/.ssh/id_work");
        manager.add(present).unwrap();
    }

    #[test]
    fn test_update_replaces_and_allows_rename() {
        let (mut manager, _temp) = manager();
        manager.add(Profile::new("work", "old@work.com")).unwrap();
        manager.add(Profile::new("home", "me@home.org")).unwrap();

        manager
            .update("work", Profile::new("work", "new@work.com"))
            .unwrap();
        assert_eq!(manager.get("work").unwrap().email, "new@work.com");

        let clash = manager.update("work", Profile::new("home", "x@y.z"));
        assert!(matches!(clash, Err(ConfigError::DuplicateProfile(_))));

        manager
            .update("work", Profile::new("office", "new@work.com"))
            .unwrap();
        assert!(manager.get("work").is_err());
        assert_eq!(manager.list()[0].name, "office");

        assert!(matches!(
            manager.update("nope", Profile::new("nope", "a@b.c")),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_delete_respects_mapping_predicate() {
        let (mut manager, _temp) = manager();
        manager.add(Profile::new("work", "me@work.com")).unwrap();

        let refused = manager.delete("work", |_| Ok(true));
        assert!(matches!(refused, Err(ConfigError::ProfileMapped(_))));
        assert_eq!(manager.len(), 1);

        let removed = manager.delete("work", |_| Ok(false)).unwrap();
        assert_eq!(removed.name, "work");
        assert!(manager.is_empty());

        assert!(matches!(
            manager.delete("work", |_| Ok(false)),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }
}
