//! Orchestrates one bulk clone operation.

use super::single::{clone_one, create_retry_options};
use super::{CloneReport, CloneResult, ProgressEvent, RunError};
use crate::api::IssueService;
use crate::history::{HistoryLedger, OperationDraft};
use crate::links::{reconcile_links, LinkStore};
use crate::model::{IdMap, Issue, Project};
use crate::retry::RetryOptions;
use crate::validate::validate_selection;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// One user-initiated bulk clone: the selected issues and where they go.
#[derive(Debug, Clone)]
pub struct CloneRequest {
    /// Selected source issues, in the order the user picked them.
    pub issues: Vec<Issue>,

    /// Project receiving the copies.
    pub target_project: Project,

    /// The search expression that produced the candidate set, if any.
    pub query: Option<String>,
}

/// Runs clone operations against a tracker, recording history and repairing
/// issue links afterwards.
///
/// All collaborators and tuning are handed over at construction; an
/// orchestrator holds no mutable global state and one `run` owns its
/// progress list and id map exclusively.
pub struct CloneOrchestrator {
    service: Arc<dyn IssueService>,
    ledger: Arc<dyn HistoryLedger>,
    links: Arc<dyn LinkStore>,
    retry_options: RetryOptions,
    progress: Option<UnboundedSender<ProgressEvent>>,
}

impl CloneOrchestrator {
    /// Builds an orchestrator with the default create-issue retry tuning.
    #[must_use]
    pub fn new(
        service: Arc<dyn IssueService>,
        ledger: Arc<dyn HistoryLedger>,
        links: Arc<dyn LinkStore>,
    ) -> Self {
        Self {
            service,
            ledger,
            links,
            retry_options: create_retry_options(),
            progress: None,
        }
    }

    /// Overrides the per-issue retry tuning.
    #[must_use]
    pub fn with_retry_options(mut self, retry_options: RetryOptions) -> Self {
        self.retry_options = retry_options;
        self
    }

    /// Attaches a progress channel. Events are emitted as each issue
    /// finishes; a dropped receiver is ignored.
    #[must_use]
    pub fn with_progress(mut self, sender: UnboundedSender<ProgressEvent>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Runs one bulk clone operation to completion.
    ///
    /// Issues are processed strictly sequentially - one in-flight create at
    /// a time bounds the request rate and keeps the id map race-free. A
    /// failing issue never aborts the batch, and nothing is rolled back:
    /// the incrementally written history is the recovery record.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] only for operation-level setup failures (invalid
    /// selection, or the history record could not be created); in that case
    /// no issue was attempted.
    pub async fn run(&self, request: CloneRequest) -> Result<CloneReport, RunError> {
        validate_selection(&request.issues, &request.target_project.id)?;

        let total = request.issues.len();
        let source_project_id = request.issues[0].project.clone();
        let operation_id = self.ledger.create_operation(&OperationDraft {
            source_project_id: source_project_id.clone(),
            target_project_id: request.target_project.id.clone(),
            total_issues: total,
            query: request.query.clone(),
        })?;

        info!(
            operation_id = %operation_id,
            source = %source_project_id,
            target = %request.target_project.id,
            total,
            "Clone operation started"
        );
        self.emit(ProgressEvent::Started {
            operation_id: operation_id.clone(),
            total,
        });

        let mut results: Vec<CloneResult> = request
            .issues
            .iter()
            .map(|issue| CloneResult::pending(issue.clone()))
            .collect();
        let mut id_map = IdMap::new();
        let mut successful = 0;
        let mut failed = 0;

        for (index, issue) in request.issues.iter().enumerate() {
            let result = clone_one(
                self.service.as_ref(),
                issue,
                &request.target_project,
                index,
                &self.retry_options,
            )
            .await;

            if let Some(target_id) = result.target_id() {
                id_map.insert(issue.id.clone(), target_id.to_string());
                successful += 1;
            } else {
                failed += 1;
            }

            // Degraded history never stops the remaining issues; in-memory
            // progress stays authoritative for this session.
            if let Some(record) = result.to_record(&operation_id) {
                if let Err(error) = self.ledger.append_issue_result(&record) {
                    warn!(%error, source_key = %issue.key, "Error storing clone history entry");
                }
            }

            results[index] = result.clone();
            self.emit(ProgressEvent::IssueFinished { index, result });
        }

        if let Err(error) = self.ledger.finalize_operation(&operation_id, successful, failed) {
            warn!(%error, "Error finalizing clone history");
        }

        let source_ids: Vec<String> = request.issues.iter().map(|i| i.id.clone()).collect();
        let reconciliation = match reconcile_links(self.links.as_ref(), &source_ids, &id_map) {
            Ok(stats) => Some(stats),
            Err(error) => {
                warn!(%error, "Link reconciliation failed");
                None
            }
        };

        info!(total, successful, failed, "Clone operation completed");
        self.emit(ProgressEvent::Completed {
            operation_id: operation_id.clone(),
            successful,
            failed,
        });

        Ok(CloneReport {
            operation_id,
            results,
            successful,
            failed,
            reconciliation,
        })
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.progress {
            // The receiver side going away must not affect the operation.
            let _ = sender.send(event);
        }
    }
}
