//! Git identity profile model.

use serde::{Deserialize, Serialize};

/// A named git identity.
///
/// Optional fields are stored as `None` or an empty string interchangeably;
/// the accessors treat both as "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile name, also used as the fragment file suffix
    pub name: String,

    /// Email address written to `user.email`
    pub email: String,

    /// Value for `user.name`; falls back to `name` when unset
    #[serde(default, skip_serializing_if = "is_blank")]
    pub author_name: Option<String>,

    /// Private key passed to `ssh -i` through `core.sshCommand`
    #[serde(default, skip_serializing_if = "is_blank")]
    pub ssh_key_path: Option<String>,

    /// Key id written to `user.signingkey`
    #[serde(default, skip_serializing_if = "is_blank")]
    pub gpg_key_id: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Profile {
    /// Create a profile with the required fields
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Builder: set the author name override
    pub fn author_name(mut self, author_name: impl Into<String>) -> Self {
        self.author_name = Some(author_name.into());
        self
    }

    /// Builder: set the SSH key path
    pub fn ssh_key_path(mut self, path: impl Into<String>) -> Self {
        self.ssh_key_path = Some(path.into());
        self
    }

    /// Builder: set the signing key id
    pub fn gpg_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.gpg_key_id = Some(key_id.into());
        self
    }

    /// Name used for commits: the author override, or the profile name.
    pub fn effective_author_name(&self) -> &str {
        non_empty(&self.author_name).unwrap_or(&self.name)
    }

    pub fn signing_key(&self) -> Option<&str> {
        non_empty(&self.gpg_key_id)
    }

    pub fn ssh_key(&self) -> Option<&str> {
        non_empty(&self.ssh_key_path)
    }
}
