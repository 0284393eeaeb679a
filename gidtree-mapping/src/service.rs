//! Map and unmap profiles to directories.
//!
//! `MappingService` is the entry point callers use. It keeps at most one
//! `includeIf` block per normalized directory and refuses to hand a
//! directory that already belongs to one profile over to another.

use crate::editor::{IncludeDirectiveEditor, UpsertOutcome};
use crate::error::{MappingError, Result};
use crate::fragment::ConfigFragmentWriter;
use crate::layout::GitLayout;
use crate::parser::{Mapping, MappingParser};
use gidtree_config::{PathNormalizer, Profile};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MappingService {
    paths: PathNormalizer,
    parser: MappingParser,
    editor: IncludeDirectiveEditor,
    writer: ConfigFragmentWriter,
}

impl MappingService {
    pub fn new(layout: &GitLayout) -> Self {
        Self {
            paths: layout.paths().clone(),
            parser: MappingParser::new(layout),
            editor: IncludeDirectiveEditor::new(layout),
            writer: ConfigFragmentWriter::new(layout),
        }
    }

    /// Service for the current user's git setup.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&GitLayout::from_env()?))
    }

    pub fn config_path(&self) -> &Path {
        self.parser.config_path()
    }

    pub fn paths(&self) -> &PathNormalizer {
        &self.paths
    }

    pub fn fragment_path_for(&self, name: &str) -> PathBuf {
        self.writer.fragment_path_for(name)
    }

    /// Map `directory` to `profile`.
    ///
    /// Mapping the same profile again rewrites its fragment and the existing
    /// block. The fragment is written before the block so a failed write
    /// never leaves a block pointing at a missing file.
    pub fn map(&self, profile: &Profile, directory: &str) -> Result<Mapping> {
        let normalized = self.paths.normalize_dir(directory)?;

        if let Some(existing) = self
            .parser
            .parse()?
            .into_iter()
            .find(|m| m.directory == normalized)
            && existing.profile != profile.name
        {
            let profile = if existing.profile.is_empty() {
                existing.fragment_path.display().to_string()
            } else {
                existing.profile
            };
            return Err(MappingError::Conflict {
                directory: normalized,
                profile,
            });
        }

        let fragment_path = self.writer.write(profile)?;
        let outcome = self.editor.upsert(&normalized, &fragment_path)?;
        if outcome == UpsertOutcome::Updated {
            log::debug!("Directory {} was already mapped, block refreshed", normalized);
        }

        log::info!("Mapped profile '{}' to {}", profile.name, normalized);
        Ok(Mapping {
            directory: normalized,
            profile: profile.name.clone(),
            fragment_path,
        })
    }

    /// Remove the mapping for `directory`. Returns false when nothing was mapped.
    pub fn unmap(&self, directory: &str) -> Result<bool> {
        let normalized = self.paths.normalize_dir(directory)?;
        let removed = self.editor.remove(&normalized)?;
        if removed {
            log::info!("Unmapped {}", normalized);
        }
        Ok(removed)
    }

    /// Unmap every directory pointing at `name`'s fragment.
    pub fn unmap_profile(&self, name: &str) -> Result<Vec<String>> {
        let directories = self.parser.directories_for_profile(name)?;
        for directory in &directories {
            self.editor.remove(directory)?;
        }
        if !directories.is_empty() {
            log::info!(
                "Unmapped {} directories from profile '{}'",
                directories.len(),
                name
            );
        }
        Ok(directories)
    }

    /// Rewrite the fragment of a mapped profile so edits take effect.
    ///
    /// Returns the fragment path, or `None` when the profile is not mapped
    /// anywhere and no fragment was written.
    pub fn refresh_profile(&self, profile: &Profile) -> Result<Option<PathBuf>> {
        if !self.parser.is_profile_mapped(&profile.name)? {
            return Ok(None);
        }
        self.writer.write(profile).map(Some)
    }

    /// Delete a profile's fragment file. Returns false when there was none.
    pub fn remove_fragment(&self, name: &str) -> Result<bool> {
        self.writer.remove(name)
    }

    pub fn mappings(&self) -> Result<Vec<Mapping>> {
        self.parser.parse()
    }

    pub fn lookup(&self, directory: &str) -> Result<Option<Mapping>> {
        self.parser.lookup(directory)
    }

    pub fn is_profile_mapped(&self, name: &str) -> Result<bool> {
        self.parser.is_profile_mapped(name)
    }

    pub fn directories_for_profile(&self, name: &str) -> Result<Vec<String>> {
        self.parser.directories_for_profile(name)
    }
}
