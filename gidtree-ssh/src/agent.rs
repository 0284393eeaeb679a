//! Load and unload profile keys in the running ssh-agent.
//!
//! Everything goes through the `ssh-add` and `ssh-keygen` command-line tools.
//! Keys are identified in the agent by fingerprint, which is the second
//! field of `ssh-keygen -lf <key>` output.

use crate::error::{AgentError, Result};
use gidtree_config::{PathNormalizer, Profile};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Operations gidtree needs from an SSH key agent.
pub trait KeyAgent {
    /// Add the key to the agent unless it is already there.
    fn load_key(&self, key_path: &str) -> Result<()>;

    /// Remove the key from the agent.
    fn unload_key(&self, key_path: &str) -> Result<()>;

    /// Whether the agent currently holds the key. A missing agent counts as
    /// "not loaded" rather than an error.
    fn is_key_loaded(&self, key_path: &str) -> Result<bool>;
}

/// Load the profile's key, if it has one.
pub fn load_key_for_profile(agent: &dyn KeyAgent, profile: &Profile) -> Result<()> {
    match profile.ssh_key() {
        Some(key) => agent.load_key(key),
        None => Ok(()),
    }
}

/// Unload the profile's key, if it has one.
pub fn unload_key_for_profile(agent: &dyn KeyAgent, profile: &Profile) -> Result<()> {
    match profile.ssh_key() {
        Some(key) => agent.unload_key(key),
        None => Ok(()),
    }
}

/// Fingerprint field of an `ssh-keygen -l` line.
///
/// ```text
/// 256 SHA256:AbCd... me@host (ED25519)
/// ```
pub fn parse_fingerprint(output: &str) -> Option<&str> {
    output.split_whitespace().nth(1)
}

/// [`KeyAgent`] backed by the OpenSSH tools.
#[derive(Debug, Clone)]
pub struct SshAgent {
    paths: PathNormalizer,
    ssh_add: String,
    ssh_keygen: String,
}

impl SshAgent {
    pub fn new(paths: PathNormalizer) -> Self {
        Self::with_programs(paths, "ssh-add", "ssh-keygen")
    }

    /// Use specific `ssh-add` / `ssh-keygen` executables.
    pub fn with_programs(
        paths: PathNormalizer,
        ssh_add: impl Into<String>,
        ssh_keygen: impl Into<String>,
    ) -> Self {
        Self {
            paths,
            ssh_add: ssh_add.into(),
            ssh_keygen: ssh_keygen.into(),
        }
    }

    fn resolve(&self, key_path: &str) -> Result<PathBuf> {
        let normalized = self.paths.normalize(key_path)?;
        if !normalized.exists() {
            return Err(AgentError::KeyNotFound(normalized));
        }
        Ok(normalized)
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        log::debug!("Running {} {}", program, args.join(" "));
        Command::new(program)
            .args(args)
            .output()
            .map_err(|source| AgentError::Spawn {
                program: program.to_string(),
                source,
            })
    }

    fn run_checked(&self, program: &str, args: &[&str]) -> Result<Output> {
        let output = self.run(program, args)?;
        if !output.status.success() {
            return Err(AgentError::CommandFailed {
                command: format!("{} {}", program, args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    fn fingerprint_output(&self, key: &Path) -> Result<String> {
        let key = key.to_string_lossy();
        let output = self.run_checked(&self.ssh_keygen, &["-lf", key.as_ref()])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn loaded(&self, key: &Path) -> Result<bool> {
        let output = self.fingerprint_output(key)?;
        let Some(fingerprint) = parse_fingerprint(&output) else {
            return Ok(false);
        };

        let listing = match self.run(&self.ssh_add, &["-l"]) {
            Ok(out) if out.status.success() => out,
            _ => {
                log::debug!("ssh-agent listing unavailable, treating key as not loaded");
                return Ok(false);
            }
        };
        Ok(String::from_utf8_lossy(&listing.stdout).contains(fingerprint))
    }
}

impl KeyAgent for SshAgent {
    fn load_key(&self, key_path: &str) -> Result<()> {
        let key = self.resolve(key_path)?;
        if self.loaded(&key)? {
            log::debug!("SSH key {:?} already loaded", key);
            return Ok(());
        }

        let key_arg = key.to_string_lossy();
        self.run_checked(&self.ssh_add, &[key_arg.as_ref()])?;
        log::info!("Loaded SSH key {:?}", key);
        Ok(())
    }

    fn unload_key(&self, key_path: &str) -> Result<()> {
        let key = self.paths.normalize(key_path)?;
        let output = self.fingerprint_output(&key)?;
        let fingerprint = parse_fingerprint(&output)
            .ok_or_else(|| AgentError::UnexpectedFingerprint(output.trim().to_string()))?;

        if let Err(e) = self.run_checked(&self.ssh_add, &["-d", fingerprint]) {
            log::debug!("Removing by fingerprint failed ({e}), retrying by path");
            let key_arg = key.to_string_lossy();
            self.run_checked(&self.ssh_add, &["-d", key_arg.as_ref()])?;
        }
        log::info!("Unloaded SSH key {:?}", key);
        Ok(())
    }

    fn is_key_loaded(&self, key_path: &str) -> Result<bool> {
        let key = self.paths.normalize(key_path)?;
        self.loaded(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingAgent {
        loaded: RefCell<Vec<String>>,
        unloaded: RefCell<Vec<String>>,
    }

    impl KeyAgent for RecordingAgent {
        fn load_key(&self, key_path: &str) -> Result<()> {
            self.loaded.borrow_mut().push(key_path.to_string());
            Ok(())
        }

        fn unload_key(&self, key_path: &str) -> Result<()> {
            self.unloaded.borrow_mut().push(key_path.to_string());
            Ok(())
        }

        fn is_key_loaded(&self, key_path: &str) -> Result<bool> {
            Ok(self.loaded.borrow().iter().any(|k| k == key_path))
        }
    }

    fn key_file() -> (tempfile::TempDir, String) {
        let temp = tempdir().unwrap();
        let key = temp.path().join("id_test");
        std::fs::write(&key, "not a real key").unwrap();
        let key = key.to_string_lossy().into_owned();
        (temp, key)
    }

    #[test]
    fn test_parse_fingerprint() {
        assert_eq!(
            parse_fingerprint("256 SHA256:abcDEF123 me@host (ED25519)\n"),
            Some("SHA256:abcDEF123")
        );
        assert_eq!(parse_fingerprint("256"), None);
        assert_eq!(parse_fingerprint(""), None);
    }

    #[test]
    fn test_profile_helpers_skip_profiles_without_key() {
        let agent = RecordingAgent::default();
        let profile = Profile::new("p", "p@x.y").ssh_key_path("");
        load_key_for_profile(&agent, &profile).unwrap();
        unload_key_for_profile(&agent, &profile).unwrap();
        assert!(agent.loaded.borrow().is_empty());
        assert!(agent.unloaded.borrow().is_empty());
    }

    #[test]
    fn test_profile_helpers_forward_key_path() {
        let agent = RecordingAgent::default();
        let profile = Profile::new("p", "p@x.y").ssh_key_path("~/.ssh/id_p");
        load_key_for_profile(&agent, &profile).unwrap();
        assert!(agent.is_key_loaded("~/.ssh/id_p").unwrap());
        unload_key_for_profile(&agent, &profile).unwrap();
        assert_eq!(agent.unloaded.borrow().as_slice(), ["~/.ssh/id_p"]);
    }

    #[test]
    fn test_load_missing_key_fails_before_spawning() {
        let temp = tempdir().unwrap();
        let agent = SshAgent::with_programs(
            PathNormalizer::with_home(temp.path()),
            "/nonexistent/ssh-add",
            "/nonexistent/ssh-keygen",
        );
        let result = agent.load_key("~/.ssh/id_missing");
        match result {
            Err(AgentError::KeyNotFound(path)) => {
                assert_eq!(path, temp.path().join(".ssh").join("id_missing"));
            }
            other => panic!("expected KeyNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_keygen_is_spawn_error() {
        let (_temp, key) = key_file();
        let agent = SshAgent::with_programs(
            PathNormalizer::with_home("/"),
            "/nonexistent/ssh-add",
            "/nonexistent/ssh-keygen",
        );
        assert!(matches!(
            agent.is_key_loaded(&key),
            Err(AgentError::Spawn { .. })
        ));
    }

    // `echo -lf <key>` stands in for ssh-keygen: its second field is the key
    // path, which then acts as the fingerprint.
    #[cfg(unix)]
    #[test]
    fn test_agent_unavailable_means_not_loaded() {
        let (_temp, key) = key_file();
        let agent = SshAgent::with_programs(PathNormalizer::with_home("/"), "false", "echo");
        assert!(!agent.is_key_loaded(&key).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_load_key_reports_ssh_add_failure() {
        let (_temp, key) = key_file();
        let agent = SshAgent::with_programs(PathNormalizer::with_home("/"), "false", "echo");
        assert!(matches!(
            agent.load_key(&key),
            Err(AgentError::CommandFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_and_unload_succeed_with_working_tools() {
        let (_temp, key) = key_file();
        let agent = SshAgent::with_programs(PathNormalizer::with_home("/"), "true", "echo");
        agent.load_key(&key).unwrap();
        agent.unload_key(&key).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unload_rejects_short_fingerprint_output() {
        let (_temp, key) = key_file();
        let agent = SshAgent::with_programs(PathNormalizer::with_home("/"), "true", "true");
        assert!(matches!(
            agent.unload_key(&key),
            Err(AgentError::UnexpectedFingerprint(_))
        ));
    }
}
