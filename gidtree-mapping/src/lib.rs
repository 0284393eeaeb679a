//! Directory-to-profile mapping engine for gidtree.
//!
//! Each profile gets its own git config fragment (`~/.gitconfig-<name>`),
//! and the shared `~/.gitconfig` pulls it in through a conditional include:
//!
//! ```text
//! [includeIf "gitdir/i:/home/me/work/"]
//!     path = ~/.gitconfig-work
//! ```
//!
//! The shared config is the only record of which directory uses which
//! profile. [`MappingService`] reads and rewrites it on every call.

pub mod directive;
pub mod document;
pub mod editor;
pub mod error;
pub mod fragment;
pub mod layout;
pub mod parser;
pub mod service;

pub use directive::{BlockScanner, RawBlock, ScanState};
pub use document::ConfigDocument;
pub use editor::{IncludeDirectiveEditor, UpsertOutcome};
pub use error::{MappingError, Result};
pub use fragment::{ConfigFragmentWriter, FRAGMENT_PREFIX, extract_profile_name};
pub use layout::GitLayout;
pub use parser::{Mapping, MappingParser, find_mapping};
pub use service::MappingService;
