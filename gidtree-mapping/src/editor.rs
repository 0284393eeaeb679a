//! Insert, update and remove managed `includeIf` blocks in the shared git
//! config while leaving every unrelated line untouched.

use crate::directive::{header_directory, header_line, normalize_header_dir, path_line, path_value};
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::layout::GitLayout;
use gidtree_config::PathNormalizer;
use std::path::{Path, PathBuf};

/// What [`IncludeDirectiveEditor::upsert`] did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An existing block's path line was rewritten
    Updated,
    /// A new block was appended
    Appended,
}

#[derive(Debug, Clone)]
pub struct IncludeDirectiveEditor {
    config_path: PathBuf,
    paths: PathNormalizer,
}

impl IncludeDirectiveEditor {
    pub fn new(layout: &GitLayout) -> Self {
        Self {
            config_path: layout.git_config().to_path_buf(),
            paths: layout.paths().clone(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Point the block for `directory` at `fragment`, adding it if needed.
    ///
    /// `directory` must already be normalized with a trailing separator. Only
    /// a header immediately followed by a path line counts as an existing
    /// block; anything else gets a fresh block appended at the end.
    pub fn upsert(&self, directory: &str, fragment: &Path) -> Result<UpsertOutcome> {
        let mut doc = ConfigDocument::read_or_default(&self.config_path)?;
        let rendered = self.paths.contract_home(fragment);

        let existing = doc.lines.iter().enumerate().find_map(|(i, line)| {
            let raw_dir = header_directory(line)?;
            let next = doc.lines.get(i + 1)?;
            (normalize_header_dir(&self.paths, raw_dir) == directory && path_value(next).is_some())
                .then_some(i + 1)
        });

        let outcome = match existing {
            Some(index) => {
                let mut line = path_line(&rendered);
                if doc.lines[index].ends_with('\r') {
                    line.push('\r');
                }
                doc.lines[index] = line;
                UpsertOutcome::Updated
            }
            None => {
                doc.lines.push(String::new());
                doc.lines.push(header_line(directory));
                doc.lines.push(path_line(&rendered));
                UpsertOutcome::Appended
            }
        };

        doc.save(&self.config_path)?;
        log::info!(
            "{:?} includeIf block for {} -> {} in {:?}",
            outcome,
            directory,
            rendered,
            self.config_path
        );
        Ok(outcome)
    }

    /// Remove every block whose header matches `directory`.
    ///
    /// The header and the single line after it are dropped, along with the
    /// blank separator line before the header. Returns false, leaving the
    /// file untouched, when no block matched or the file does not exist.
    pub fn remove(&self, directory: &str) -> Result<bool> {
        let Some(mut doc) = ConfigDocument::read(&self.config_path)? else {
            log::debug!("No git config at {:?}, nothing to remove", self.config_path);
            return Ok(false);
        };

        let mut kept: Vec<String> = Vec::with_capacity(doc.lines.len());
        let mut removed = false;
        let mut skip_next = false;

        for (i, line) in doc.lines.iter().enumerate() {
            if skip_next {
                skip_next = false;
                continue;
            }

            if let Some(raw_dir) = header_directory(line)
                && normalize_header_dir(&self.paths, raw_dir) == directory
            {
                removed = true;
                skip_next = true;
                let blank_before = i > 0 && doc.lines[i - 1].trim().is_empty();
                if blank_before && kept.last().is_some_and(|l| l.trim().is_empty()) {
                    kept.pop();
                }
                continue;
            }

            kept.push(line.clone());
        }

        if !removed {
            log::debug!("No includeIf block for {} in {:?}", directory, self.config_path);
            return Ok(false);
        }

        doc.lines = kept;
        doc.save(&self.config_path)?;
        log::info!("Removed includeIf block for {} from {:?}", directory, self.config_path);
        Ok(true)
    }
}
