//! Durable clone history.
//!
//! Every bulk operation writes one [`CloneOperation`] row plus one
//! [`IssueResultRecord`] per issue, appended as soon as that issue's outcome
//! is terminal. A crash mid-batch therefore leaves an inspectable record of
//! exactly which issues were created.

mod error;
mod memory;
mod record;
mod sqlite;

pub use error::LedgerError;
pub use memory::MemoryLedger;
pub use record::{CloneOperation, IssueResultRecord, OperationDraft, ResultStatus};
pub use sqlite::SqliteLedger;

/// The history operations the orchestrator consumes.
///
/// Implementations must make `append_issue_result` durable before returning
/// and must serialize writes within one operation id; there is no ordering
/// requirement across operations.
pub trait HistoryLedger: Send + Sync {
    /// Creates a new operation record and returns its generated id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the record cannot be persisted; the
    /// orchestrator aborts the whole run in that case.
    fn create_operation(&self, draft: &OperationDraft) -> Result<String, LedgerError>;

    /// Appends one issue's terminal outcome. Durable before return.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on write failure.
    fn append_issue_result(&self, record: &IssueResultRecord) -> Result<(), LedgerError>;

    /// Writes the final success/failure counts for an operation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownOperation`] if the id was never created.
    fn finalize_operation(
        &self,
        operation_id: &str,
        successful: usize,
        failed: usize,
    ) -> Result<(), LedgerError>;

    /// Lists all recorded operations, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on read failure.
    fn list_operations(&self) -> Result<Vec<CloneOperation>, LedgerError>;

    /// Returns the per-issue results of one operation, in append order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on read failure.
    fn results_for(&self, operation_id: &str) -> Result<Vec<IssueResultRecord>, LedgerError>;

    /// Deletes all history rows.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on write failure.
    fn reset_all(&self) -> Result<(), LedgerError>;
}
