//! Pre-flight validation.
//!
//! Cheap structural checks that fail fast before any network round trip.
//! This is not a schema validator; the tracker remains the authority on
//! what it accepts.

use crate::model::{Issue, IssueType};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons a selection of issues cannot be cloned as one operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No issues were selected.
    #[error("no issues selected")]
    EmptySelection,

    /// No target project was given.
    #[error("target project is required")]
    MissingTargetProject,

    /// The selection spans more than one source project.
    #[error("all selected issues must be from the same project")]
    MixedSourceProjects,

    /// Source and target are the same project.
    #[error("source and target projects must be different")]
    SameProject,

    /// Epics and subtasks cannot be cloned together.
    #[error("cannot clone epics and subtasks in the same operation")]
    EpicSubtaskMix,
}

/// Returns true iff the issue carries the minimum fields needed to clone it:
/// non-empty `id`, `key` and `project`.
#[must_use]
pub fn is_cloneable(issue: &Issue) -> bool {
    !issue.id.is_empty() && !issue.key.is_empty() && !issue.project.is_empty()
}

/// Validates a selection before an operation starts.
///
/// All selected issues must come from one source project, which must differ
/// from the target, and a selection never mixes epics with subtasks.
///
/// # Errors
///
/// Returns the first [`SelectionError`] found; nothing is attempted when
/// validation fails.
pub fn validate_selection(issues: &[Issue], target_project_id: &str) -> Result<(), SelectionError> {
    if issues.is_empty() {
        return Err(SelectionError::EmptySelection);
    }
    if target_project_id.is_empty() {
        return Err(SelectionError::MissingTargetProject);
    }

    let source_projects: HashSet<&str> = issues.iter().map(|i| i.project.as_str()).collect();
    if source_projects.len() > 1 {
        return Err(SelectionError::MixedSourceProjects);
    }
    if source_projects.contains(target_project_id) {
        return Err(SelectionError::SameProject);
    }

    let has_epics = issues.iter().any(|i| i.issue_type == IssueType::Epic);
    let has_subtasks = issues.iter().any(|i| i.issue_type == IssueType::Subtask);
    if has_epics && has_subtasks {
        return Err(SelectionError::EpicSubtaskMix);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssuePriority, IssueStatus};
    use chrono::Utc;

    fn issue(id: &str, project: &str, issue_type: IssueType) -> Issue {
        Issue {
            id: id.to_string(),
            key: format!("{}-{}", project.to_uppercase(), id),
            summary: "a summary".to_string(),
            description: None,
            issue_type,
            status: IssueStatus::Open,
            priority: IssuePriority::Medium,
            assignee: None,
            reporter: None,
            labels: Vec::new(),
            epic: None,
            parent: None,
            project: project.to_string(),
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn cloneable_requires_id_key_and_project() {
        let ok = issue("1", "core", IssueType::Task);
        assert!(is_cloneable(&ok));

        let mut missing_id = ok.clone();
        missing_id.id.clear();
        assert!(!is_cloneable(&missing_id));

        let mut missing_key = ok.clone();
        missing_key.key.clear();
        assert!(!is_cloneable(&missing_key));

        let mut missing_project = ok;
        missing_project.project.clear();
        assert!(!is_cloneable(&missing_project));
    }

    #[test]
    fn empty_summary_is_still_cloneable() {
        let mut it = issue("1", "core", IssueType::Task);
        it.summary.clear();
        assert!(is_cloneable(&it));
    }

    #[test]
    fn selection_must_be_non_empty_with_a_target() {
        assert_eq!(
            validate_selection(&[], "pd"),
            Err(SelectionError::EmptySelection)
        );
        assert_eq!(
            validate_selection(&[issue("1", "core", IssueType::Task)], ""),
            Err(SelectionError::MissingTargetProject)
        );
    }

    #[test]
    fn selection_rejects_mixed_source_projects() {
        let issues = [
            issue("1", "core", IssueType::Task),
            issue("2", "infra", IssueType::Task),
        ];
        assert_eq!(
            validate_selection(&issues, "pd"),
            Err(SelectionError::MixedSourceProjects)
        );
    }

    #[test]
    fn selection_rejects_cloning_into_the_source_project() {
        let issues = [issue("1", "core", IssueType::Task)];
        assert_eq!(
            validate_selection(&issues, "core"),
            Err(SelectionError::SameProject)
        );
    }

    #[test]
    fn selection_rejects_epic_subtask_mix() {
        let issues = [
            issue("1", "core", IssueType::Epic),
            issue("2", "core", IssueType::Subtask),
        ];
        assert_eq!(
            validate_selection(&issues, "pd"),
            Err(SelectionError::EpicSubtaskMix)
        );

        let epics_only = [issue("1", "core", IssueType::Epic)];
        assert_eq!(validate_selection(&epics_only, "pd"), Ok(()));
    }
}
