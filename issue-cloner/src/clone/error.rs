//! Clone pipeline error types.

use crate::api::ApiError;
use crate::history::LedgerError;
use crate::validate::SelectionError;
use thiserror::Error;

/// Why a single issue failed to clone.
#[derive(Debug, Clone, Error)]
pub enum CloneError {
    /// The source issue is missing required fields; never retried and never
    /// sent to the tracker.
    #[error("invalid issue data: {0}")]
    Validation(String),

    /// The tracker API failed (transient or rejection, per the
    /// [`ApiError`] taxonomy).
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Why a whole clone run could not proceed.
///
/// Per-issue failures are NOT represented here; they are isolated into the
/// per-slot [`CloneOutcome`](super::CloneOutcome) and never abort the batch.
#[derive(Debug, Error)]
pub enum RunError {
    /// The selection failed entry validation; nothing was attempted.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The operation's history record could not be created at all.
    #[error("failed to store clone history: {0}")]
    Ledger(#[from] LedgerError),
}
