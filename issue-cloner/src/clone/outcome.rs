//! Per-issue clone outcomes and progress events.

use crate::history::{IssueResultRecord, ResultStatus};
use crate::model::Issue;
use serde::Serialize;

/// State of one issue within a clone operation.
///
/// An outcome starts `Pending` and transitions exactly once, to `Success`
/// or `Failed`; it never reverses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CloneOutcome {
    /// Queued, not yet attempted.
    Pending,

    /// Cloned; carries the newly created target issue.
    Success {
        /// The synthesized target issue.
        target: Issue,
    },

    /// Clone failed; the operation kept going with the remaining issues.
    Failed {
        /// Human-readable error text.
        error: String,
    },
}

impl CloneOutcome {
    /// True once the outcome is no longer pending.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// True for a successful clone.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// One issue's slot in the operation's progress list. The slot index always
/// matches the original selection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloneResult {
    /// The source issue, kept attached for traceability.
    pub source: Issue,

    /// Current outcome.
    pub outcome: CloneOutcome,
}

impl CloneResult {
    /// A fresh pending slot for `source`.
    #[must_use]
    pub fn pending(source: Issue) -> Self {
        Self {
            source,
            outcome: CloneOutcome::Pending,
        }
    }

    /// Id of the created target issue, when the clone succeeded.
    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        match &self.outcome {
            CloneOutcome::Success { target } => Some(&target.id),
            _ => None,
        }
    }

    /// Converts a terminal result into its history record. Returns `None`
    /// while still pending.
    #[must_use]
    pub fn to_record(&self, operation_id: &str) -> Option<IssueResultRecord> {
        let (status, target_id, target_key, error) = match &self.outcome {
            CloneOutcome::Pending => return None,
            CloneOutcome::Success { target } => (
                ResultStatus::Success,
                Some(target.id.clone()),
                Some(target.key.clone()),
                None,
            ),
            CloneOutcome::Failed { error } => {
                (ResultStatus::Failed, None, None, Some(error.clone()))
            }
        };

        Some(IssueResultRecord {
            clone_operation_id: operation_id.to_string(),
            source_issue_id: self.source.id.clone(),
            source_issue_key: self.source.key.clone(),
            target_issue_id: target_id,
            target_issue_key: target_key,
            status,
            error_message: error,
        })
    }
}

/// Progressive state emitted by the orchestrator, one event per suspension
/// point, so a UI (or test harness) can render per-issue progress without
/// waiting for the whole batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The operation record was created and cloning is about to begin.
    Started {
        /// History id of the operation.
        operation_id: String,
        /// Number of issues queued.
        total: usize,
    },

    /// One issue reached a terminal outcome.
    IssueFinished {
        /// Index into the original selection order.
        index: usize,
        /// The terminal result for that slot.
        result: CloneResult,
    },

    /// All issues processed and history finalized.
    Completed {
        /// History id of the operation.
        operation_id: String,
        /// Final success count.
        successful: usize,
        /// Final failure count.
        failed: usize,
    },
}
