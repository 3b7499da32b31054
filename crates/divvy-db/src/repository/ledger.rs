//! Append-only ledger entry storage.
//!
//! ## Storage Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ledger_entries                                       │
//! │                                                                         │
//! │  seq         Monotonic append order (AUTOINCREMENT). Replay order.     │
//! │  id          The entry's own UUID. UNIQUE backs duplicate rejection.   │
//! │  kind        'expense' | 'payment' | 'void'  (indexed filter column)   │
//! │  group_id    Scope column for group filters, NULL for personal/void.   │
//! │  payload     Full LedgerEntry as JSON. The record structure (split    │
//! │              method, allocation lines) round-trips without a table     │
//! │              per variant.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are inserted and read, never updated or deleted. Reversal is a new
//! `void` row, exactly as in the in-memory ledger.

use sqlx::{Row, SqlitePool};
use tracing::debug;

use divvy_core::{Ledger, LedgerEntry};

use crate::error::{DbError, DbResult};

/// Persistent ledger entry storage.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends one entry.
    ///
    /// Fails with [`DbError::UniqueViolation`] if the id was already
    /// persisted. Callers append to the in-memory [`Ledger`] first (which
    /// runs the full domain validation) and persist only on success.
    pub async fn save(&self, entry: &LedgerEntry) -> DbResult<()> {
        let payload = serde_json::to_string(entry)
            .map_err(|e| DbError::Internal(format!("serialize ledger entry: {e}")))?;

        sqlx::query(
            "INSERT INTO ledger_entries (id, kind, group_id, created_at, payload) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.id())
        .bind(entry.kind())
        .bind(entry.group_id())
        .bind(entry.created_at())
        .bind(payload)
        .execute(&self.pool)
        .await?;

        debug!(id = %entry.id(), kind = entry.kind(), "Ledger entry saved");
        Ok(())
    }

    /// Loads every entry in append order.
    pub async fn load(&self) -> DbResult<Vec<LedgerEntry>> {
        let rows = sqlx::query("SELECT id, payload FROM ledger_entries ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let payload: String = row.get("payload");
                serde_json::from_str(&payload).map_err(|e| DbError::corrupt(&id, e.to_string()))
            })
            .collect()
    }

    /// Rebuilds the in-memory ledger from storage.
    ///
    /// Replays every row through the ledger's own append validation, so a
    /// tampered database surfaces as an error rather than wrong balances.
    pub async fn load_ledger(&self) -> DbResult<Ledger> {
        let entries = self.load().await?;
        Ledger::seed(entries)
            .map_err(|e| DbError::corrupt("ledger", format!("replay failed: {e}")))
    }

    /// Fetches one entry by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<LedgerEntry> {
        let row = sqlx::query("SELECT payload FROM ledger_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Ledger entry", id))?;

        let payload: String = row.get("payload");
        serde_json::from_str(&payload).map_err(|e| DbError::corrupt(id, e.to_string()))
    }

    /// Number of persisted entries.
    pub async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM ledger_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}
