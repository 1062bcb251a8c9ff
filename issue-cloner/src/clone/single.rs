//! Cloning of exactly one issue.

use super::{CloneError, CloneOutcome, CloneResult};
use crate::api::{ApiError, IssueService};
use crate::model::{Issue, Project};
use crate::retry::{retry_if, RetryOptions};
use crate::validate::is_cloneable;
use chrono::Utc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};

/// Retry tuning for the create-issue call site: slower initial delay and a
/// gentler factor than the generic default, since issue creation is the
/// rate-limited hot path.
#[must_use]
pub fn create_retry_options() -> RetryOptions {
    RetryOptions {
        max_attempts: 3,
        initial_delay: Duration::from_millis(2000),
        backoff_factor: 1.5,
    }
}

/// Clones one issue into the target project, returning a terminal
/// [`CloneResult`] (never `Pending`).
///
/// A source issue that fails the structural check is rejected before any
/// network round trip. Transient create failures are retried per
/// `retry_options`; explicit server rejections are not, since repeating an
/// invalid request cannot succeed. Either way the failure is isolated into
/// the returned result; this function does not error.
pub async fn clone_one(
    service: &dyn IssueService,
    source: &Issue,
    target_project: &Project,
    index: usize,
    retry_options: &RetryOptions,
) -> CloneResult {
    let span = info_span!("clone_issue", source_key = %source.key, index);

    async {
        if !is_cloneable(source) {
            let error = CloneError::Validation("issue is missing required fields".to_string());
            warn!(%error, "Rejecting issue before any create attempt");
            return CloneResult {
                source: source.clone(),
                outcome: CloneOutcome::Failed {
                    error: error.to_string(),
                },
            };
        }

        let created = retry_if(
            || service.create_issue(source, &target_project.key),
            retry_options,
            ApiError::is_retryable,
        )
        .await;

        match created {
            Ok(created) => {
                let target = synthesize_target(source, target_project, &created.id, &created.key, index);
                info!(target_key = %target.key, "Issue cloned");
                CloneResult {
                    source: source.clone(),
                    outcome: CloneOutcome::Success { target },
                }
            }
            Err(error) => {
                warn!(%error, "Issue clone failed");
                CloneResult {
                    source: source.clone(),
                    outcome: CloneOutcome::Failed {
                        error: CloneError::from(error).to_string(),
                    },
                }
            }
        }
    }
    .instrument(span)
    .await
}

/// Builds the target issue record: every field copied from the source except
/// identity, project and timestamps. A tracker that does not echo a key back
/// gets a position-derived one.
fn synthesize_target(
    source: &Issue,
    target_project: &Project,
    new_id: &str,
    new_key: &str,
    index: usize,
) -> Issue {
    let now = Utc::now();
    let key = if new_key.is_empty() {
        format!("{}-{}", target_project.key.to_uppercase(), 100 + index)
    } else {
        new_key.to_string()
    };

    Issue {
        id: new_id.to_string(),
        key,
        project: target_project.id.clone(),
        created: now,
        updated: now,
        ..source.clone()
    }
}
