// Dedup Ledger - persistent record of items already replied to
// Append-only; rows are never updated or pruned

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// Outcome of a mark call. Marking an id that is already present is a
/// no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Recorded,
    AlreadyRecorded,
}

/// Persistent set of item identifiers already replied to. Existence of a row
/// is the sole source of truth for "already handled"; the annotations
/// themselves are never stored.
pub struct ProcessedLedger {
    conn: Connection,
}

impl ProcessedLedger {
    /// Open (or create) the ledger at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open ledger database at {}", path.display()))?;

        // WAL mode for crash recovery
        conn.pragma_update(None, "journal_mode", "WAL")
            .context("failed to enable WAL mode on ledger database")?;

        Self::from_connection(conn)
    }

    /// In-memory ledger for tests and one-shot runs. Not durable.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory ledger")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS processed_items (
                item_id TEXT PRIMARY KEY,
                recorded_at TEXT NOT NULL
            )",
            [],
        )
        .context("failed to create processed_items table")?;

        Ok(ProcessedLedger { conn })
    }

    /// Has a reply already been posted for this item id?
    pub fn has_processed(&self, item_id: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM processed_items WHERE item_id = ?1")?;
        let exists = stmt.exists(params![item_id])?;
        Ok(exists)
    }

    /// Record an item id as replied to.
    pub fn mark_processed(&self, item_id: &str) -> Result<MarkOutcome> {
        let changed = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO processed_items (item_id, recorded_at) VALUES (?1, ?2)",
                params![item_id, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to record item {item_id} in ledger"))?;

        Ok(if changed == 0 {
            MarkOutcome::AlreadyRecorded
        } else {
            MarkOutcome::Recorded
        })
    }

    /// Number of items ever recorded.
    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM processed_items", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fresh_ledger_has_nothing() {
        let ledger = ProcessedLedger::open_in_memory().unwrap();
        assert!(!ledger.has_processed("t1_abc").unwrap());
        assert_eq!(ledger.count().unwrap(), 0);
    }

    #[test]
    fn test_mark_then_check() {
        let ledger = ProcessedLedger::open_in_memory().unwrap();
        assert_eq!(
            ledger.mark_processed("t1_abc").unwrap(),
            MarkOutcome::Recorded
        );
        assert!(ledger.has_processed("t1_abc").unwrap());
        assert!(!ledger.has_processed("t1_def").unwrap());
    }

    #[test]
    fn test_double_mark_is_a_noop() {
        let ledger = ProcessedLedger::open_in_memory().unwrap();
        ledger.mark_processed("t1_abc").unwrap();
        assert_eq!(
            ledger.mark_processed("t1_abc").unwrap(),
            MarkOutcome::AlreadyRecorded
        );
        assert_eq!(ledger.count().unwrap(), 1);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("ledger.db");

        {
            let ledger = ProcessedLedger::open(&db_path).unwrap();
            ledger.mark_processed("t1_abc").unwrap();
            ledger.mark_processed("t1_def").unwrap();
        }

        let reopened = ProcessedLedger::open(&db_path).unwrap();
        assert!(reopened.has_processed("t1_abc").unwrap());
        assert!(reopened.has_processed("t1_def").unwrap());
        assert_eq!(reopened.count().unwrap(), 2);
    }
}
