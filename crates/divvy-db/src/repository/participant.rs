//! Participant storage.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use divvy_core::Participant;

use crate::error::{DbError, DbResult};

/// Participant registration and lookup.
#[derive(Clone)]
pub struct ParticipantRepository {
    pool: SqlitePool,
}

impl ParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new participant.
    ///
    /// Fails with [`DbError::UniqueViolation`] on a duplicate id.
    pub async fn insert(&self, participant: &Participant) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO participants (id, display_name, created_at) VALUES (?, ?, ?)",
        )
        .bind(&participant.id)
        .bind(&participant.display_name)
        .bind(participant.created_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %participant.id, name = %participant.display_name, "Participant inserted");
        Ok(())
    }

    /// Fetches a participant by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Participant> {
        let row = sqlx::query(
            "SELECT id, display_name, created_at FROM participants WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Participant", id))?;

        Self::from_row(&row)
    }

    /// Lists all participants, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Participant>> {
        let rows = sqlx::query(
            "SELECT id, display_name, created_at FROM participants ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    /// Total participant count.
    pub async fn count(&self) -> DbResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM participants")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> DbResult<Participant> {
        let created_at: DateTime<Utc> = row.get("created_at");
        Ok(Participant {
            id: row.get("id"),
            display_name: row.get("display_name"),
            created_at,
        })
    }
}
