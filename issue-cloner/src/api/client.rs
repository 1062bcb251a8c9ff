//! Jira REST v3 client.
//!
//! A thin [`IssueService`] implementation over reqwest. Credentials live in
//! an explicit [`ClientConfig`] handed over at construction time; there is
//! no mutable global configuration.

use super::{ApiError, CreatedIssue, IssueService};
use crate::model::{Issue, IssuePriority, IssueStatus, IssueType, Project, UserRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Maximum issues returned per search.
const MAX_SEARCH_RESULTS: u32 = 50;

/// Connection settings for a Jira-compatible tracker.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the tracker, e.g. `https://example.atlassian.net`.
    pub base_url: String,
    /// Account email for basic auth.
    pub email: String,
    /// API token for basic auth.
    pub api_token: String,
}

/// Errors building a [`JiraClient`].
#[derive(Debug, Error)]
pub enum ClientConfigError {
    /// The configured base URL did not parse.
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// [`IssueService`] implementation against a Jira REST v3 endpoint.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: Url,
    email: String,
    api_token: String,
}

impl JiraClient {
    /// Builds a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientConfigError`] if the base URL is malformed or the
    /// HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientConfigError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| ClientConfigError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url,
            email: config.email,
            api_token: config.api_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}rest/api/3/{path}", self.base_url)
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response, ApiError> {
        // Credentials are deliberately absent from all log output.
        debug!(path, "POST request to tracker");
        self.http
            .post(self.endpoint(path))
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        debug!(path, "GET request to tracker");
        self.http
            .get(self.endpoint(path))
            .basic_auth(&self.email, Some(&self.api_token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

#[async_trait]
impl IssueService for JiraClient {
    async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>, ApiError> {
        let jql = normalize_jql(jql);
        info!(%jql, "Searching issues");

        let body = json!({
            "jql": jql,
            "maxResults": MAX_SEARCH_RESULTS,
            "fields": [
                "summary", "description", "issuetype", "status", "priority",
                "assignee", "reporter", "labels", "parent", "created",
                "updated", "project"
            ],
        });

        let response = self.post("search", body).await?;
        let response = check_status(response).await?;
        let wire: WireSearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(wire.issues.into_iter().map(WireIssue::into_issue).collect())
    }

    async fn create_issue(
        &self,
        source: &Issue,
        target_project_key: &str,
    ) -> Result<CreatedIssue, ApiError> {
        info!(source_key = %source.key, target = %target_project_key, "Creating issue");

        // Assignee and reporter are dropped: target-project users rarely
        // match source-project users, and the server rejects unknown ids.
        let body = json!({
            "fields": {
                "project": { "key": target_project_key },
                "summary": source.summary,
                "description": source.description,
                "issuetype": { "name": source.issue_type.to_string() },
                "labels": source.labels,
            },
        });

        let response = self.post("issue", body).await?;
        let response = check_status(response).await?;
        let created: WireCreated = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(CreatedIssue {
            id: created.id,
            key: created.key,
        })
    }

    async fn get_project(&self, key: &str) -> Result<Project, ApiError> {
        info!(project_key = %key, "Resolving project");

        let response = self.get(&format!("project/{key}")).await?;
        let response = check_status(response).await?;
        let wire: WireProject = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Project {
            id: wire.id,
            key: wire.key,
            name: wire.name,
        })
    }
}

/// Maps a non-success HTTP response to the [`ApiError`] taxonomy,
/// surfacing the server's own message where one is present.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<WireErrorBody>().await {
        Ok(body) if !body.error_messages.is_empty() => body.error_messages.join("; "),
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ApiError::from_status(status.as_u16(), message))
}

/// Normalizes single-key shorthand: a bare "PROJ-123" becomes a key query.
fn normalize_jql(jql: &str) -> String {
    let trimmed = jql.trim();
    let looks_like_key = trimmed.split_once('-').is_some_and(|(prefix, number)| {
        !prefix.is_empty()
            && prefix.chars().all(|c| c.is_ascii_uppercase())
            && !number.is_empty()
            && number.chars().all(|c| c.is_ascii_digit())
    });
    if looks_like_key {
        format!("key = \"{trimmed}\"")
    } else {
        trimmed.to_string()
    }
}

// Wire-format structs for the REST v3 payloads.

#[derive(Debug, Deserialize)]
struct WireSearchResponse {
    #[serde(default)]
    issues: Vec<WireIssue>,
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    id: String,
    key: String,
    fields: WireFields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFields {
    #[serde(default)]
    summary: String,
    description: Option<String>,
    issuetype: WireNamed,
    status: WireNamed,
    priority: Option<WireNamed>,
    assignee: Option<WireUser>,
    reporter: Option<WireUser>,
    #[serde(default)]
    labels: Vec<String>,
    parent: Option<WireRef>,
    project: WireRef,
    created: String,
    updated: String,
}

#[derive(Debug, Deserialize)]
struct WireNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    account_id: String,
    display_name: String,
    email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WireCreated {
    id: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct WireProject {
    id: String,
    key: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
}

impl WireIssue {
    fn into_issue(self) -> Issue {
        Issue {
            id: self.id,
            key: self.key,
            summary: self.fields.summary,
            description: self.fields.description,
            issue_type: IssueType::parse_lenient(&self.fields.issuetype.name),
            status: IssueStatus::parse_lenient(&self.fields.status.name),
            priority: self
                .fields
                .priority
                .map_or(IssuePriority::Medium, |p| IssuePriority::parse_lenient(&p.name)),
            assignee: self.fields.assignee.map(WireUser::into_user_ref),
            reporter: self.fields.reporter.map(WireUser::into_user_ref),
            labels: self.fields.labels,
            // REST v3 has no standalone epic field; an epic relationship
            // arrives as the parent reference.
            epic: None,
            parent: self.fields.parent.map(|p| p.id),
            project: self.fields.project.id,
            created: parse_timestamp(&self.fields.created),
            updated: parse_timestamp(&self.fields.updated),
        }
    }
}

impl WireUser {
    fn into_user_ref(self) -> UserRef {
        UserRef {
            id: self.account_id,
            name: self.display_name,
            email: self.email_address,
        }
    }
}

/// Parses Jira's timestamp format (`2024-01-01T12:00:00.000+0000`), falling
/// back to RFC 3339, then to the current time for unparseable values.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_issue_key_becomes_a_key_query() {
        assert_eq!(normalize_jql("CORE-42"), "key = \"CORE-42\"");
        assert_eq!(normalize_jql("  CORE-42  "), "key = \"CORE-42\"");
    }

    #[test]
    fn real_jql_passes_through() {
        assert_eq!(
            normalize_jql("project = CORE AND status != Closed"),
            "project = CORE AND status != Closed"
        );
        assert_eq!(normalize_jql("core-42"), "core-42");
    }

    #[test]
    fn jira_timestamps_parse() {
        let dt = parse_timestamp("2024-03-05T09:30:00.000+0000");
        assert_eq!(dt.to_rfc3339(), "2024-03-05T09:30:00+00:00");

        let rfc = parse_timestamp("2024-03-05T09:30:00Z");
        assert_eq!(dt, rfc);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = JiraClient::new(ClientConfig {
            base_url: "not a url".into(),
            email: "user@example.com".into(),
            api_token: "token".into(),
        });
        assert!(matches!(
            result,
            Err(ClientConfigError::InvalidBaseUrl { .. })
        ));
    }
}
