//! Clones issues between projects of a Jira-compatible tracker.
//!
//! The pipeline: select issues (by JQL) -> create copies in a target
//! project through a rate-limited, unreliable API -> record a durable
//! per-issue history -> rebuild cross-issue links among the new copies.
//! Per-issue failures are isolated; the batch always runs to completion.

pub mod api;
pub mod clone;
pub mod history;
pub mod links;
pub mod model;
pub mod retry;
pub mod validate;

pub use api::{ApiError, ClientConfig, ClientConfigError, CreatedIssue, IssueService, JiraClient};
pub use clone::{
    clone_one, create_retry_options, CloneError, CloneOrchestrator, CloneOutcome, CloneReport,
    CloneRequest, CloneResult, ProgressEvent, RunError,
};
pub use history::{
    CloneOperation, HistoryLedger, IssueResultRecord, LedgerError, MemoryLedger, OperationDraft,
    ResultStatus, SqliteLedger,
};
pub use links::{reconcile_links, LinkStore, ReconcileStats};
pub use model::{
    IdMap, Issue, IssueLink, IssuePriority, IssueStatus, IssueType, Project, UserRef,
};
pub use retry::{retry, retry_if, RetryOptions};
pub use validate::{is_cloneable, validate_selection, SelectionError};
