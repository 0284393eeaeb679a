//! Recognition of managed `includeIf` blocks.
//!
//! A managed block is a header line followed by a `path = ...` line:
//!
//! ```text
//! [includeIf "gitdir/i:/home/me/work/"]
//!     path = ~/.gitconfig-work
//! ```
//!
//! Block boundaries are structural: the header plus the single line after it.
//! [`BlockScanner`] holds the two-state machine used when reading blocks back.

use gidtree_config::{PathNormalizer, with_trailing_slash};
use regex::Regex;
use std::sync::OnceLock;

static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
static PATH_REGEX: OnceLock<Regex> = OnceLock::new();

fn header_regex() -> &'static Regex {
    HEADER_REGEX.get_or_init(|| {
        Regex::new(r#"^\s*\[includeIf\s+"gitdir/i:(.+)"\]\s*$"#)
            .expect("Failed to compile includeIf header regex")
    })
}

fn path_regex() -> &'static Regex {
    PATH_REGEX.get_or_init(|| {
        Regex::new(r"^\s*path\s*=\s*(.+)\s*$").expect("Failed to compile path line regex")
    })
}

/// Directory embedded in an `[includeIf "gitdir/i:<dir>"]` header, as written.
pub fn header_directory(line: &str) -> Option<&str> {
    header_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Value of a `path = <value>` line, trimmed.
pub fn path_value(line: &str) -> Option<&str> {
    path_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

pub fn header_line(directory: &str) -> String {
    format!(r#"[includeIf "gitdir/i:{directory}"]"#)
}

pub fn path_line(fragment: &str) -> String {
    format!("    path = {fragment}")
}

/// Normalize a header directory for comparison, keeping the raw string when
/// normalization fails.
pub fn normalize_header_dir(paths: &PathNormalizer, raw: &str) -> String {
    paths
        .normalize_dir(raw)
        .unwrap_or_else(|_| with_trailing_slash(raw))
}

/// A header/path pair read back from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Normalized directory, trailing-slash terminated
    pub directory: String,
    /// Path value exactly as written (may start with `~`)
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Scanning,
    AwaitingPath {
        directory: String,
    },
}

/// Line-at-a-time block recognizer.
///
/// - A header moves to `AwaitingPath`, replacing any pending directory.
/// - A path line while awaiting completes a block.
/// - Any other section header while awaiting drops the pending directory.
#[derive(Debug, Default)]
pub struct BlockScanner {
    state: ScanState,
}

impl BlockScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Feed one line; returns a block when this line completes one.
    pub fn feed<F>(&mut self, line: &str, normalize: F) -> Option<RawBlock>
    where
        F: FnOnce(&str) -> String,
    {
        let line = line.trim();

        if let Some(raw_dir) = header_directory(line) {
            self.state = ScanState::AwaitingPath {
                directory: normalize(raw_dir),
            };
            return None;
        }

        if !matches!(self.state, ScanState::AwaitingPath { .. }) {
            return None;
        }

        if let Some(value) = path_value(line) {
            if let ScanState::AwaitingPath { directory } = std::mem::take(&mut self.state) {
                return Some(RawBlock {
                    directory,
                    path: value.to_string(),
                });
            }
        } else if line.starts_with('[') {
            log::debug!("Discarding includeIf block without path line");
            self.state = ScanState::Scanning;
        }
        None
    }
}
