//! Project information.

use serde::{Deserialize, Serialize};

/// A named container of issues, identified by a short code ("key").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Opaque project id.
    pub id: String,

    /// Short project code, e.g. "PROJ".
    pub key: String,

    /// Display name.
    pub name: String,
}

impl Project {
    /// Convenience constructor.
    #[must_use]
    pub fn new(id: impl Into<String>, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            name: name.into(),
        }
    }
}
