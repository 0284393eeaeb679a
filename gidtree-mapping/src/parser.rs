//! Reconstruct directory mappings from the shared git config.
//!
//! Nothing is cached: every query re-reads the file, which stays the single
//! source of truth.

use crate::directive::{BlockScanner, normalize_header_dir};
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::fragment::extract_profile_name;
use crate::layout::GitLayout;
use gidtree_config::PathNormalizer;
use std::path::{Path, PathBuf};

/// A directory associated with a profile fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Normalized directory with a trailing separator
    pub directory: String,
    /// Profile name from the fragment file name; empty for foreign fragments
    pub profile: String,
    /// Fragment path with `~` expanded
    pub fragment_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct MappingParser {
    config_path: PathBuf,
    paths: PathNormalizer,
}

impl MappingParser {
    pub fn new(layout: &GitLayout) -> Self {
        Self {
            config_path: layout.git_config().to_path_buf(),
            paths: layout.paths().clone(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// All mappings in file order. A missing config yields an empty list.
    pub fn parse(&self) -> Result<Vec<Mapping>> {
        match ConfigDocument::read(&self.config_path)? {
            Some(doc) => Ok(self.parse_lines(doc.lines.iter().map(String::as_str))),
            None => Ok(Vec::new()),
        }
    }

    /// Parse config text directly.
    pub fn parse_str(&self, content: &str) -> Vec<Mapping> {
        self.parse_lines(content.lines())
    }

    fn parse_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<Mapping> {
        let mut scanner = BlockScanner::new();
        let mut mappings = Vec::new();

        for line in lines {
            let block = scanner.feed(line, |raw| normalize_header_dir(&self.paths, raw));
            if let Some(block) = block {
                let fragment_path = self.paths.expand_tilde(&block.path);
                mappings.push(Mapping {
                    directory: block.directory,
                    profile: extract_profile_name(&fragment_path),
                    fragment_path,
                });
            }
        }

        log::debug!("Parsed {} mappings from {:?}", mappings.len(), self.config_path);
        mappings
    }

    /// Mapping that applies to `directory`: exact match first, then the first
    /// mapped ancestor in file order.
    pub fn lookup(&self, directory: &str) -> Result<Option<Mapping>> {
        let normalized = self.paths.normalize_dir(directory)?;
        let mappings = self.parse()?;
        Ok(find_mapping(&mappings, &normalized).cloned())
    }

    pub fn is_profile_mapped(&self, profile: &str) -> Result<bool> {
        Ok(self.parse()?.iter().any(|m| m.profile == profile))
    }

    /// Directories mapped to `profile`, in file order.
    pub fn directories_for_profile(&self, profile: &str) -> Result<Vec<String>> {
        Ok(self
            .parse()?
            .into_iter()
            .filter(|m| m.profile == profile)
            .map(|m| m.directory)
            .collect())
    }
}

/// Resolve a normalized, trailing-slash directory against parsed mappings.
pub fn find_mapping<'a>(mappings: &'a [Mapping], normalized_dir: &str) -> Option<&'a Mapping> {
    mappings
        .iter()
        .find(|m| m.directory == normalized_dir)
        .or_else(|| {
            mappings
                .iter()
                .find(|m| normalized_dir.starts_with(m.directory.as_str()))
        })
}
