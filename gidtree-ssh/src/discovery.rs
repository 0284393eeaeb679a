//! Private key suggestions from `~/.ssh`.

use std::path::Path;

const KNOWN_KEY_NAMES: &[&str] = &["github", "gitlab", "bitbucket"];

/// Whether a file name looks like a private key worth suggesting.
fn is_private_key_name(name: &str) -> bool {
    if name.ends_with(".pub") {
        return false;
    }
    name.starts_with("id_") || KNOWN_KEY_NAMES.contains(&name)
}

/// List private keys in `ssh_dir` as sorted `~/.ssh/<name>` strings.
///
/// A missing or unreadable directory yields no suggestions.
pub fn discover_private_keys(ssh_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(ssh_dir) else {
        log::debug!("No SSH directory at {:?}", ssh_dir);
        return Vec::new();
    };

    let mut keys: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter(|name| is_private_key_name(name))
        .map(|name| format!("~/.ssh/{name}"))
        .collect();
    keys.sort();

    log::debug!("Discovered {} SSH keys in {:?}", keys.len(), ssh_dir);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_private_key_name() {
        assert!(is_private_key_name("id_ed25519"));
        assert!(is_private_key_name("id_rsa_work"));
        assert!(is_private_key_name("github"));
        assert!(!is_private_key_name("id_ed25519.pub"));
        assert!(!is_private_key_name("known_hosts"));
        assert!(!is_private_key_name("config"));
        assert!(!is_private_key_name("github.pub"));
    }

    #[test]
    fn test_discover_private_keys() {
        let temp = tempdir().unwrap();
        for name in [
            "id_rsa",
            "id_rsa.pub",
            "id_ed25519",
            "gitlab",
            "known_hosts",
            "config",
        ] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        fs::create_dir(temp.path().join("id_dir")).unwrap();

        assert_eq!(
            discover_private_keys(temp.path()),
            vec!["~/.ssh/gitlab", "~/.ssh/id_ed25519", "~/.ssh/id_rsa"]
        );
    }

    #[test]
    fn test_discover_missing_dir() {
        let temp = tempdir().unwrap();
        assert!(discover_private_keys(&temp.path().join("absent")).is_empty());
    }
}
