//! In-memory history ledger.
//!
//! Backs the test suite and `--dry-run` style usage where no database path
//! is configured. Same contract as the SQLite ledger, minus durability.

use super::{CloneOperation, HistoryLedger, IssueResultRecord, LedgerError, OperationDraft};
use crate::links::LinkStore;
use crate::model::IssueLink;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    operations: Vec<CloneOperation>,
    results: Vec<IssueResultRecord>,
    links: Vec<IssueLink>,
}

/// Volatile [`HistoryLedger`] and [`LinkStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: Mutex<Inner>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a pre-existing issue link, for tests exercising reconciliation.
    pub fn seed_link(&self, link: IssueLink) {
        self.inner().links.push(link);
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HistoryLedger for MemoryLedger {
    fn create_operation(&self, draft: &OperationDraft) -> Result<String, LedgerError> {
        let id = Uuid::new_v4().to_string();
        self.inner().operations.push(CloneOperation {
            id: id.clone(),
            source_project_id: draft.source_project_id.clone(),
            target_project_id: draft.target_project_id.clone(),
            total_issues: draft.total_issues,
            successful_issues: 0,
            failed_issues: 0,
            created_at: Utc::now(),
            query: draft.query.clone(),
        });
        Ok(id)
    }

    fn append_issue_result(&self, record: &IssueResultRecord) -> Result<(), LedgerError> {
        self.inner().results.push(record.clone());
        Ok(())
    }

    fn finalize_operation(
        &self,
        operation_id: &str,
        successful: usize,
        failed: usize,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner();
        let operation = inner
            .operations
            .iter_mut()
            .find(|op| op.id == operation_id)
            .ok_or_else(|| LedgerError::UnknownOperation {
                operation_id: operation_id.to_string(),
            })?;
        operation.successful_issues = successful;
        operation.failed_issues = failed;
        Ok(())
    }

    fn list_operations(&self) -> Result<Vec<CloneOperation>, LedgerError> {
        let inner = self.inner();
        let mut operations = inner.operations.clone();
        operations.reverse();
        Ok(operations)
    }

    fn results_for(&self, operation_id: &str) -> Result<Vec<IssueResultRecord>, LedgerError> {
        Ok(self
            .inner()
            .results
            .iter()
            .filter(|r| r.clone_operation_id == operation_id)
            .cloned()
            .collect())
    }

    fn reset_all(&self) -> Result<(), LedgerError> {
        let mut inner = self.inner();
        inner.operations.clear();
        inner.results.clear();
        Ok(())
    }
}

impl LinkStore for MemoryLedger {
    fn links_among(&self, source_issue_ids: &[String]) -> Result<Vec<IssueLink>, LedgerError> {
        Ok(self
            .inner()
            .links
            .iter()
            .filter(|l| source_issue_ids.iter().any(|id| *id == l.source_issue_id))
            .cloned()
            .collect())
    }

    fn insert_link(&self, link: &IssueLink) -> Result<(), LedgerError> {
        self.inner().links.push(link.clone());
        Ok(())
    }
}
