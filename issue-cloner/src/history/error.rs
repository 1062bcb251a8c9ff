//! History ledger error types.

use thiserror::Error;

/// Errors from the durable history store.
///
/// Ledger failures during a clone run are deliberately non-fatal: the
/// orchestrator logs them and keeps processing, since in-memory progress is
/// authoritative for the current session.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Underlying SQLite failure.
    #[error("history store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The referenced operation does not exist.
    #[error("unknown clone operation '{operation_id}'")]
    UnknownOperation { operation_id: String },
}
