//! Issue link records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded relationship between two issues.
///
/// The `metadata` payload is opaque to the cloner; reconciliation copies it
/// verbatim onto the recreated link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLink {
    /// Opaque row id.
    pub id: String,

    /// Id of the issue the link originates from.
    pub source_issue_id: String,

    /// Id of the issue the link points to.
    pub target_issue_id: String,

    /// Opaque link metadata (e.g. link type), when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl IssueLink {
    /// Creates a new link row with a fresh id and the current time.
    #[must_use]
    pub fn new(
        source_issue_id: impl Into<String>,
        target_issue_id: impl Into<String>,
        metadata: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_issue_id: source_issue_id.into(),
            target_issue_id: target_issue_id.into(),
            metadata,
            created_at: Utc::now(),
        }
    }
}
