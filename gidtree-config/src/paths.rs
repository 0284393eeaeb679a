//! Path resolution: home directory lookup, tilde expansion, absolute-path
//! normalization with symlink resolution, and trailing-slash handling.
//!
//! Directory strings written into `includeIf` conditions must be byte-identical
//! for equivalent paths, so everything that compares directories goes through
//! [`PathNormalizer::normalize_dir`].

use crate::error::{ConfigError, Result};
use std::path::{Component, Path, PathBuf};

/// Resolves user-supplied paths against a fixed home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNormalizer {
    home: PathBuf,
}

impl PathNormalizer {
    /// Build a normalizer for the current user's home directory.
    pub fn from_env() -> Result<Self> {
        dirs::home_dir().map(Self::with_home).ok_or_else(|| {
            ConfigError::Environment("could not determine the home directory".to_string())
        })
    }

    /// Build a normalizer with an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Expand a leading `~` to the home directory.
    ///
    /// Only `~` on its own or followed by a separator is expanded; `~user`
    /// forms are returned unchanged. No absolutization or symlink resolution
    /// happens here.
    pub fn expand_tilde(&self, path: &str) -> PathBuf {
        if path == "~" {
            return self.home.clone();
        }
        if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                return self.home.clone();
            }
            return self.home.join(rest);
        }
        PathBuf::from(path)
    }

    /// Convert a path to an absolute, canonical path.
    ///
    /// Expands `~`, resolves relative paths against the current directory,
    /// removes `.`/`..` segments, then resolves symlinks. Paths that do not
    /// exist yet keep their cleaned absolute form.
    pub fn normalize(&self, path: &str) -> Result<PathBuf> {
        let expanded = self.expand_tilde(path);
        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            let cwd = std::env::current_dir().map_err(|e| {
                ConfigError::Environment(format!("could not determine current directory: {e}"))
            })?;
            cwd.join(expanded)
        };

        let cleaned = clean_path(&absolute);
        match std::fs::canonicalize(&cleaned) {
            Ok(resolved) => Ok(resolved),
            Err(_) => Ok(cleaned),
        }
    }

    /// [`normalize`](Self::normalize) rendered as a string with a trailing separator.
    pub fn normalize_dir(&self, path: &str) -> Result<String> {
        let normalized = self.normalize(path)?;
        Ok(with_trailing_slash(&normalized.to_string_lossy()))
    }

    /// Render `path` with a `~` shorthand when it lives under the home directory.
    pub fn contract_home(&self, path: &Path) -> String {
        match path.strip_prefix(&self.home) {
            Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
            Ok(rest) => format!("~/{}", rest.to_string_lossy().replace('\\', "/")),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }

    /// String variant of [`contract_home`](Self::contract_home) for display.
    ///
    /// Keeps any trailing separator of the input.
    pub fn contract_home_str(&self, path: &str) -> String {
        let trailing = path.len() > 1 && (path.ends_with('/') || path.ends_with('\\'));
        let contracted = self.contract_home(Path::new(path));
        if trailing && contracted != path {
            with_trailing_slash(&contracted)
        } else {
            contracted
        }
    }
}

/// Ensure a directory path ends with a separator. Empty input stays empty.
pub fn with_trailing_slash(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') || path.ends_with('\\') {
        return path.to_string();
    }
    format!("{path}{}", std::path::MAIN_SEPARATOR)
}

/// Lexically clean a path: drop `.` segments and apply `..` segments.
///
/// `..` never climbs above the root of an absolute path.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
