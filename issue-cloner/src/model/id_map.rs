//! Source-to-target id remapping.

use std::collections::HashMap;

/// The id remapping accumulated during one clone operation.
///
/// Maps each successfully cloned source issue id to the id of its newly
/// created target issue. Owned exclusively by one orchestrator run and
/// handed to the link reconciler once all issues are processed.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    entries: HashMap<String, String>,
}

impl IdMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `source_id` was cloned as `target_id`.
    pub fn insert(&mut self, source_id: impl Into<String>, target_id: impl Into<String>) {
        self.entries.insert(source_id.into(), target_id.into());
    }

    /// Looks up the target id for a source id.
    #[must_use]
    pub fn get(&self, source_id: &str) -> Option<&str> {
        self.entries.get(source_id).map(String::as_str)
    }

    /// Returns true if `source_id` was cloned successfully.
    #[must_use]
    pub fn contains(&self, source_id: &str) -> bool {
        self.entries.contains_key(source_id)
    }

    /// Number of successfully remapped issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no issue was cloned successfully.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
