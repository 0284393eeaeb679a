//! Whole-file line access to the shared git config.
//!
//! Lines are split on `\n` only so carriage returns and every other byte of
//! untouched lines are written back exactly as read. Saving goes through a
//! sibling temp file and a rename.

use crate::error::{MappingError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    pub lines: Vec<String>,
    trailing_newline: bool,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            trailing_newline: true,
        }
    }
}

impl ConfigDocument {
    pub fn parse(content: &str) -> Self {
        if content.is_empty() {
            return Self::default();
        }
        let trailing_newline = content.ends_with('\n');
        let body = content.strip_suffix('\n').unwrap_or(content);
        Self {
            lines: body.split('\n').map(String::from).collect(),
            trailing_newline,
        }
    }

    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    /// Read the file; `None` when it does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(Self::parse(&content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(MappingError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Read the file, treating a missing file as empty.
    pub fn read_or_default(path: &Path) -> Result<Self> {
        Ok(Self::read(path)?.unwrap_or_default())
    }

    /// Replace the file with this document.
    ///
    /// A symlinked config is written through to its target so dotfile
    /// managers keep their link. Existing permissions are carried over.
    pub fn save(&self, path: &Path) -> Result<()> {
        let target = resolve_target(path);
        let write_err = |source: std::io::Error| MappingError::Write {
            path: target.clone(),
            source,
        };

        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp_path = temp_sibling(&target);
        fs::write(&temp_path, self.render()).map_err(write_err)?;
        if let Ok(metadata) = fs::metadata(&target) {
            let _ = fs::set_permissions(&temp_path, metadata.permissions());
        }
        if let Err(e) = fs::rename(&temp_path, &target) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(e));
        }

        log::debug!("Wrote {} lines to {:?}", self.lines.len(), target);
        Ok(())
    }
}

fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gitconfig".to_string());
    path.with_file_name(format!(".{name}.gidtree.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_render_preserves_bytes() {
        for content in [
            "",
            "\n",
            "[user]\n\tname = x\n",
            "[user]\n\tname = x",
            "a\r\nb\r\n",
            "a\n\n\nb\n\n",
        ] {
            assert_eq!(ConfigDocument::parse(content).render(), content);
        }
    }

    #[test]
    fn test_parse_lines() {
        let doc = ConfigDocument::parse("a\n\nb\n");
        assert_eq!(doc.lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_new_document_ends_with_newline() {
        let mut doc = ConfigDocument::default();
        doc.lines.push("[core]".to_string());
        assert_eq!(doc.render(), "[core]\n");
    }

    #[test]
    fn test_read_missing_is_none() {
        let temp = tempdir().unwrap();
        assert!(
            ConfigDocument::read(&temp.path().join("absent"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_read_directory_is_read_error() {
        let temp = tempdir().unwrap();
        let result = ConfigDocument::read(temp.path());
        assert!(matches!(result, Err(MappingError::Read { .. })));
    }

    #[test]
    fn test_save_creates_parents_and_leaves_no_temp() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join(".gitconfig");
        ConfigDocument::parse("[user]\n").save(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[user]\n");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_writes_through_symlink() {
        let temp = tempdir().unwrap();
        let real = temp.path().join("dotfiles-gitconfig");
        fs::write(&real, "old\n").unwrap();
        let link = temp.path().join(".gitconfig");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        ConfigDocument::parse("new\n").save(&link).unwrap();

        assert!(
            fs::symlink_metadata(&link)
                .unwrap()
                .file_type()
                .is_symlink()
        );
        assert_eq!(fs::read_to_string(&real).unwrap(), "new\n");
    }
}
