//! Tracker API boundary.
//!
//! The clone pipeline only needs two capabilities from the tracker: search
//! for issues by JQL and create one issue in a target project. They are
//! expressed as the [`IssueService`] trait so the orchestrator can run
//! against the real [`JiraClient`] or a scripted test double.

mod client;
mod error;

pub use client::{ClientConfig, ClientConfigError, JiraClient};
pub use error::ApiError;

use crate::model::{Issue, Project};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Server-assigned identity of a newly created issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// Opaque id of the new issue.
    pub id: String,

    /// Project-scoped key of the new issue, e.g. "PD-101".
    pub key: String,
}

/// The tracker capabilities the clone pipeline consumes.
#[async_trait]
pub trait IssueService: Send + Sync {
    /// Returns the issues matching a JQL query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for a malformed query (400),
    /// [`ApiError::Auth`] for bad credentials (401), and
    /// [`ApiError::Network`]/[`ApiError::Server`] for transient failures.
    async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>, ApiError>;

    /// Resolves a project by its short code, returning its tracker identity.
    ///
    /// Callers use this to turn a user-supplied project key into the real
    /// project id before validating a selection against it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when no such project exists; same
    /// taxonomy as [`IssueService::search_issues`] otherwise.
    async fn get_project(&self, key: &str) -> Result<Project, ApiError>;

    /// Creates a copy of `source` in the project identified by
    /// `target_project_key`, returning the new issue's identity.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`IssueService::search_issues`]; a rejected payload
    /// surfaces the server's message verbatim.
    async fn create_issue(
        &self,
        source: &Issue,
        target_project_key: &str,
    ) -> Result<CreatedIssue, ApiError>;
}
