//! Issue snapshot types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The issue type hierarchy of a Jira-compatible tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    Story,
    Bug,
    Task,
    Epic,
    Subtask,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Story => "Story",
            Self::Bug => "Bug",
            Self::Task => "Task",
            Self::Epic => "Epic",
            Self::Subtask => "Subtask",
        };
        f.write_str(name)
    }
}

impl IssueType {
    /// Parses a tracker-provided type name, defaulting to [`IssueType::Task`]
    /// for anything unrecognized (custom issue types clone as plain tasks).
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "Story" => Self::Story,
            "Bug" => Self::Bug,
            "Epic" => Self::Epic,
            "Subtask" | "Sub-task" => Self::Subtask,
            _ => Self::Task,
        }
    }
}

/// Workflow status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
    Closed,
    Resolved,
}

impl IssueStatus {
    /// Parses a tracker-provided status name, defaulting to
    /// [`IssueStatus::Open`] for custom workflow states.
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "In Progress" => Self::InProgress,
            "Done" => Self::Done,
            "Closed" => Self::Closed,
            "Resolved" => Self::Resolved,
            _ => Self::Open,
        }
    }
}

/// Priority of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuePriority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

impl IssuePriority {
    /// Parses a tracker-provided priority name, defaulting to
    /// [`IssuePriority::Medium`].
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "Highest" => Self::Highest,
            "High" => Self::High,
            "Low" => Self::Low,
            "Lowest" => Self::Lowest,
            _ => Self::Medium,
        }
    }
}

/// Reference to a tracker user (assignee, reporter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Opaque account id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address, when the tracker exposes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An immutable snapshot of a tracker issue.
///
/// Issues are never mutated after being fetched; cloning synthesizes a new
/// [`Issue`] rather than editing the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Opaque id, unique within one tracker instance.
    pub id: String,

    /// Human-readable project-scoped key, e.g. "PROJ-123".
    pub key: String,

    /// One-line summary. May be empty.
    pub summary: String,

    /// Longer description, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Issue type.
    #[serde(rename = "type")]
    pub issue_type: IssueType,

    /// Workflow status.
    pub status: IssueStatus,

    /// Priority.
    pub priority: IssuePriority,

    /// Current assignee, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,

    /// Reporting user, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<UserRef>,

    /// Labels attached to the issue.
    pub labels: Vec<String>,

    /// Id of the owning epic, if any. The Jira REST mapping leaves this
    /// unset, since that API reports epic membership through `parent`;
    /// the field exists for trackers that model the two separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,

    /// Id of the parent issue (for subtasks), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Id of the owning project.
    pub project: String,

    /// Creation timestamp.
    pub created: DateTime<Utc>,

    /// Last-update timestamp.
    pub updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parsing_falls_back_for_custom_values() {
        assert_eq!(IssueType::parse_lenient("Initiative"), IssueType::Task);
        assert_eq!(IssueType::parse_lenient("Sub-task"), IssueType::Subtask);
        assert_eq!(
            IssueStatus::parse_lenient("Waiting for Vendor"),
            IssueStatus::Open
        );
        assert_eq!(IssuePriority::parse_lenient("Blocker"), IssuePriority::Medium);
    }
}
