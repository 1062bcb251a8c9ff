//! Final report of one clone operation.

use super::CloneResult;
use crate::links::ReconcileStats;
use serde::Serialize;

/// Everything one `run` produced: ordered per-issue results, final counts
/// and what link reconciliation managed to do.
#[derive(Debug, Clone, Serialize)]
pub struct CloneReport {
    /// History id of the operation.
    pub operation_id: String,

    /// One terminal result per selected issue, in selection order.
    pub results: Vec<CloneResult>,

    /// Issues cloned successfully.
    pub successful: usize,

    /// Issues that failed.
    pub failed: usize,

    /// Link reconciliation stats; `None` when reconciliation itself errored
    /// (best-effort, never fails the operation).
    pub reconciliation: Option<ReconcileStats>,
}

impl CloneReport {
    /// Total issues processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }

    /// True if any issue failed to clone.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// True if every issue cloned successfully.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.failed == 0
    }
}
