//! SQLite-backed history ledger.

use super::{CloneOperation, HistoryLedger, IssueResultRecord, LedgerError, OperationDraft, ResultStatus};
use crate::links::LinkStore;
use crate::model::IssueLink;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS clone_operations (
    id TEXT PRIMARY KEY,
    source_project_id TEXT NOT NULL,
    target_project_id TEXT NOT NULL,
    total_issues INTEGER NOT NULL,
    successful_issues INTEGER NOT NULL,
    failed_issues INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    query TEXT
);

CREATE TABLE IF NOT EXISTS clone_issue_results (
    id TEXT PRIMARY KEY,
    clone_operation_id TEXT NOT NULL,
    source_issue_id TEXT NOT NULL,
    source_issue_key TEXT NOT NULL,
    target_issue_id TEXT,
    target_issue_key TEXT,
    status TEXT NOT NULL,
    error_message TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (clone_operation_id) REFERENCES clone_operations(id)
);

CREATE TABLE IF NOT EXISTS issue_links (
    id TEXT PRIMARY KEY,
    source_issue_id TEXT NOT NULL,
    target_issue_id TEXT NOT NULL,
    metadata TEXT,
    created_at TEXT NOT NULL
);
";

/// History ledger persisted in a local SQLite database.
///
/// Every write is a single auto-committed statement, so
/// [`HistoryLedger::append_issue_result`] is durable before it returns.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Opens (creating if needed) a ledger database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the database cannot be opened or the
    /// schema cannot be applied.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        debug!(path = %path.display(), "Opening history database");
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory ledger, mainly for tests and dry runs.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the schema cannot be applied.
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HistoryLedger for SqliteLedger {
    fn create_operation(&self, draft: &OperationDraft) -> Result<String, LedgerError> {
        let id = Uuid::new_v4().to_string();
        self.conn().execute(
            "INSERT INTO clone_operations
             (id, source_project_id, target_project_id, total_issues,
              successful_issues, failed_issues, created_at, query)
             VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?6)",
            params![
                id,
                draft.source_project_id,
                draft.target_project_id,
                draft.total_issues as i64,
                Utc::now().to_rfc3339(),
                draft.query,
            ],
        )?;
        Ok(id)
    }

    fn append_issue_result(&self, record: &IssueResultRecord) -> Result<(), LedgerError> {
        self.conn().execute(
            "INSERT INTO clone_issue_results
             (id, clone_operation_id, source_issue_id, source_issue_key,
              target_issue_id, target_issue_key, status, error_message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                Uuid::new_v4().to_string(),
                record.clone_operation_id,
                record.source_issue_id,
                record.source_issue_key,
                record.target_issue_id,
                record.target_issue_key,
                record.status.as_str(),
                record.error_message,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn finalize_operation(
        &self,
        operation_id: &str,
        successful: usize,
        failed: usize,
    ) -> Result<(), LedgerError> {
        let updated = self.conn().execute(
            "UPDATE clone_operations
             SET successful_issues = ?1, failed_issues = ?2
             WHERE id = ?3",
            params![successful as i64, failed as i64, operation_id],
        )?;
        if updated == 0 {
            return Err(LedgerError::UnknownOperation {
                operation_id: operation_id.to_string(),
            });
        }
        Ok(())
    }

    fn list_operations(&self) -> Result<Vec<CloneOperation>, LedgerError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, source_project_id, target_project_id, total_issues,
                    successful_issues, failed_issues, created_at, query
             FROM clone_operations
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], operation_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn results_for(&self, operation_id: &str) -> Result<Vec<IssueResultRecord>, LedgerError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT clone_operation_id, source_issue_id, source_issue_key,
                    target_issue_id, target_issue_key, status, error_message
             FROM clone_issue_results
             WHERE clone_operation_id = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map([operation_id], result_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn reset_all(&self) -> Result<(), LedgerError> {
        let conn = self.conn();
        conn.execute("DELETE FROM clone_issue_results", [])?;
        conn.execute("DELETE FROM clone_operations", [])?;
        Ok(())
    }
}

impl LinkStore for SqliteLedger {
    fn links_among(&self, source_issue_ids: &[String]) -> Result<Vec<IssueLink>, LedgerError> {
        if source_issue_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; source_issue_ids.len()].join(", ");
        let sql = format!(
            "SELECT id, source_issue_id, target_issue_id, metadata, created_at
             FROM issue_links
             WHERE source_issue_id IN ({placeholders})
             ORDER BY rowid"
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(source_issue_ids), link_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert_link(&self, link: &IssueLink) -> Result<(), LedgerError> {
        self.conn().execute(
            "INSERT INTO issue_links
             (id, source_issue_id, target_issue_id, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                link.id,
                link.source_issue_id,
                link.target_issue_id,
                link.metadata,
                link.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

fn operation_from_row(row: &Row<'_>) -> rusqlite::Result<CloneOperation> {
    Ok(CloneOperation {
        id: row.get(0)?,
        source_project_id: row.get(1)?,
        target_project_id: row.get(2)?,
        total_issues: row.get::<_, i64>(3)? as usize,
        successful_issues: row.get::<_, i64>(4)? as usize,
        failed_issues: row.get::<_, i64>(5)? as usize,
        created_at: parse_timestamp(&row.get::<_, String>(6)?),
        query: row.get(7)?,
    })
}

fn result_from_row(row: &Row<'_>) -> rusqlite::Result<IssueResultRecord> {
    let status: String = row.get(5)?;
    Ok(IssueResultRecord {
        clone_operation_id: row.get(0)?,
        source_issue_id: row.get(1)?,
        source_issue_key: row.get(2)?,
        target_issue_id: row.get(3)?,
        target_issue_key: row.get(4)?,
        // Unknown status text in a hand-edited db reads back as failed.
        status: ResultStatus::parse(&status).unwrap_or(ResultStatus::Failed),
        error_message: row.get(6)?,
    })
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<IssueLink> {
    Ok(IssueLink {
        id: row.get(0)?,
        source_issue_id: row.get(1)?,
        target_issue_id: row.get(2)?,
        metadata: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
    })
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(total: usize) -> OperationDraft {
        OperationDraft {
            source_project_id: "core".to_string(),
            target_project_id: "pd".to_string(),
            total_issues: total,
            query: Some("project = CORE".to_string()),
        }
    }

    #[test]
    fn operation_round_trips() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let id = ledger.create_operation(&draft(3)).unwrap();

        let ops = ledger.list_operations().unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].id, id);
        assert_eq!(ops[0].total_issues, 3);
        assert_eq!(ops[0].successful_issues, 0);
        assert_eq!(ops[0].failed_issues, 0);
        assert_eq!(ops[0].query.as_deref(), Some("project = CORE"));
    }

    #[test]
    fn results_append_under_the_right_operation() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let op_a = ledger.create_operation(&draft(1)).unwrap();
        let op_b = ledger.create_operation(&draft(1)).unwrap();

        ledger
            .append_issue_result(&IssueResultRecord {
                clone_operation_id: op_a.clone(),
                source_issue_id: "1".to_string(),
                source_issue_key: "CORE-1".to_string(),
                target_issue_id: Some("101".to_string()),
                target_issue_key: Some("PD-101".to_string()),
                status: ResultStatus::Success,
                error_message: None,
            })
            .unwrap();

        let for_a = ledger.results_for(&op_a).unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].status, ResultStatus::Success);
        assert_eq!(for_a[0].target_issue_key.as_deref(), Some("PD-101"));
        assert!(ledger.results_for(&op_b).unwrap().is_empty());
    }

    #[test]
    fn finalize_updates_counts_and_rejects_unknown_ids() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let id = ledger.create_operation(&draft(3)).unwrap();

        ledger.finalize_operation(&id, 2, 1).unwrap();
        let op = &ledger.list_operations().unwrap()[0];
        assert_eq!(op.successful_issues, 2);
        assert_eq!(op.failed_issues, 1);
        assert_eq!(op.successful_issues + op.failed_issues, op.total_issues);

        let missing = ledger.finalize_operation("nope", 0, 0);
        assert!(matches!(
            missing,
            Err(LedgerError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn operations_list_most_recent_first() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let first = ledger.create_operation(&draft(1)).unwrap();
        let second = ledger.create_operation(&draft(2)).unwrap();

        let ops = ledger.list_operations().unwrap();
        assert_eq!(ops[0].id, second);
        assert_eq!(ops[1].id, first);
    }

    #[test]
    fn reset_clears_history_tables() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        let id = ledger.create_operation(&draft(1)).unwrap();
        ledger
            .append_issue_result(&IssueResultRecord {
                clone_operation_id: id,
                source_issue_id: "1".to_string(),
                source_issue_key: "CORE-1".to_string(),
                target_issue_id: None,
                target_issue_key: None,
                status: ResultStatus::Failed,
                error_message: Some("boom".to_string()),
            })
            .unwrap();

        ledger.reset_all().unwrap();
        assert!(ledger.list_operations().unwrap().is_empty());
    }

    #[test]
    fn links_round_trip_and_filter_by_source() {
        let ledger = SqliteLedger::open_in_memory().unwrap();
        ledger
            .insert_link(&IssueLink::new("a", "b", Some("blocks".to_string())))
            .unwrap();
        ledger.insert_link(&IssueLink::new("x", "y", None)).unwrap();

        let found = ledger.links_among(&["a".to_string()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target_issue_id, "b");
        assert_eq!(found[0].metadata.as_deref(), Some("blocks"));

        assert!(ledger.links_among(&[]).unwrap().is_empty());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        let id = {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.create_operation(&draft(2)).unwrap()
        };

        let reopened = SqliteLedger::open(&path).unwrap();
        let ops = reopened.list_operations().unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].id, id);
    }
}
