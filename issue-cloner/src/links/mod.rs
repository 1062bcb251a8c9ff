//! Issue link reconciliation.
//!
//! After a clone run, relationships among the original source issues are
//! replayed onto the newly created target issues using the operation's
//! [`IdMap`]. Reconciliation is best-effort: links whose endpoints were not
//! both cloned are skipped (and counted), and a reconciliation failure never
//! fails the clone operation itself.

use crate::history::LedgerError;
use crate::model::{IdMap, IssueLink};
use serde::Serialize;
use tracing::{debug, info};

/// Storage for issue links, shared with the history ledger.
pub trait LinkStore: Send + Sync {
    /// Returns all links originating from any of the given source issues.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on read failure.
    fn links_among(&self, source_issue_ids: &[String]) -> Result<Vec<IssueLink>, LedgerError>;

    /// Persists one link row.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on write failure.
    fn insert_link(&self, link: &IssueLink) -> Result<(), LedgerError>;
}

/// What reconciliation did, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Links recreated between target issues.
    pub recreated: usize,

    /// Links skipped because an endpoint was not successfully cloned.
    pub skipped: usize,
}

/// Recreates source-issue links among the cloned target issues.
///
/// For every stored link whose endpoints are BOTH present in `id_map`, a new
/// link is written with the mapped ids and the original metadata preserved
/// verbatim. Links with an unmapped endpoint are skipped without error.
///
/// # Errors
///
/// Returns [`LedgerError`] if the store itself fails; callers treat this as
/// non-fatal and log it.
pub fn reconcile_links(
    store: &dyn LinkStore,
    source_issue_ids: &[String],
    id_map: &IdMap,
) -> Result<ReconcileStats, LedgerError> {
    let mut stats = ReconcileStats::default();
    let existing = store.links_among(source_issue_ids)?;

    for link in &existing {
        match (id_map.get(&link.source_issue_id), id_map.get(&link.target_issue_id)) {
            (Some(new_source), Some(new_target)) => {
                store.insert_link(&IssueLink::new(
                    new_source,
                    new_target,
                    link.metadata.clone(),
                ))?;
                stats.recreated += 1;
            }
            _ => {
                debug!(
                    source = %link.source_issue_id,
                    target = %link.target_issue_id,
                    "Skipping link with uncloned endpoint"
                );
                stats.skipped += 1;
            }
        }
    }

    info!(
        recreated = stats.recreated,
        skipped = stats.skipped,
        "Link reconciliation finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryLedger;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn recreates_links_when_both_endpoints_cloned() {
        let store = MemoryLedger::new();
        store.seed_link(IssueLink::new("a", "b", Some("blocks".to_string())));

        let mut map = IdMap::new();
        map.insert("a", "a2");
        map.insert("b", "b2");

        let stats = reconcile_links(&store, &ids(&["a", "b"]), &map).unwrap();
        assert_eq!(stats, ReconcileStats { recreated: 1, skipped: 0 });

        let new_links = store.links_among(&ids(&["a2"])).unwrap();
        assert_eq!(new_links.len(), 1);
        assert_eq!(new_links[0].target_issue_id, "b2");
        assert_eq!(new_links[0].metadata.as_deref(), Some("blocks"));
    }

    #[test]
    fn skips_links_with_an_uncloned_endpoint() {
        let store = MemoryLedger::new();
        store.seed_link(IssueLink::new("a", "b", None));

        // b failed to clone, so it never entered the map.
        let mut map = IdMap::new();
        map.insert("a", "a2");

        let stats = reconcile_links(&store, &ids(&["a", "b"]), &map).unwrap();
        assert_eq!(stats, ReconcileStats { recreated: 0, skipped: 1 });
        assert!(store.links_among(&ids(&["a2"])).unwrap().is_empty());
    }

    #[test]
    fn empty_map_recreates_nothing() {
        let store = MemoryLedger::new();
        store.seed_link(IssueLink::new("a", "b", None));

        let stats = reconcile_links(&store, &ids(&["a", "b"]), &IdMap::new()).unwrap();
        assert_eq!(stats, ReconcileStats { recreated: 0, skipped: 1 });
    }
}
