//! History record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a clone operation about to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDraft {
    /// Id of the project the issues come from.
    pub source_project_id: String,

    /// Id of the project the copies go to.
    pub target_project_id: String,

    /// Number of issues selected for this operation.
    pub total_issues: usize,

    /// The search expression that produced the candidate set, if any.
    pub query: Option<String>,
}

/// One bulk clone operation, as recorded in history.
///
/// `successful_issues` and `failed_issues` start at zero and only ever grow;
/// after finalization their sum equals `total_issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOperation {
    /// Generated operation id.
    pub id: String,

    /// Id of the project the issues came from.
    pub source_project_id: String,

    /// Id of the project the copies went to.
    pub target_project_id: String,

    /// Number of issues selected for this operation.
    pub total_issues: usize,

    /// Issues cloned successfully so far.
    pub successful_issues: usize,

    /// Issues that failed so far.
    pub failed_issues: usize,

    /// When the operation started.
    pub created_at: DateTime<Utc>,

    /// The search expression that produced the candidate set, if any.
    pub query: Option<String>,
}

/// Terminal status of one issue within an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failed,
}

impl ResultStatus {
    /// Stable string form used in the persisted schema.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// Parses the persisted string form.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One issue's recorded outcome within an operation. Append-only; written
/// as soon as the outcome is terminal so that history is observable
/// mid-operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueResultRecord {
    /// Operation this result belongs to.
    pub clone_operation_id: String,

    /// Id of the source issue.
    pub source_issue_id: String,

    /// Key of the source issue.
    pub source_issue_key: String,

    /// Id of the created target issue, present on success.
    pub target_issue_id: Option<String>,

    /// Key of the created target issue, present on success.
    pub target_issue_key: Option<String>,

    /// Terminal status.
    pub status: ResultStatus,

    /// Error text, present on failure.
    pub error_message: Option<String>,
}
