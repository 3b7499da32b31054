//! # Database Connection Pool
//!
//! SQLite connection pool setup and the `Database` entry point.
//!
//! ## Connection Settings
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SQLite Configuration                                 │
//! │                                                                         │
//! │  journal_mode = WAL      Readers never block the writer, which          │
//! │                          matters while a balance fold reads the         │
//! │                          ledger as new expenses are recorded.           │
//! │                                                                         │
//! │  foreign_keys = ON       group_members rows must reference real         │
//! │                          participants and groups.                       │
//! │                                                                         │
//! │  create_if_missing       First launch creates the database file.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::{GroupRepository, LedgerRepository, ParticipantRepository};

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file. `:memory:` for an in-memory
    /// database (tests).
    pub path: PathBuf,

    /// Maximum number of pooled connections.
    pub max_connections: u32,

    /// Timeout for acquiring a connection from the pool.
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("divvy.db"),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl DbConfig {
    /// Configuration pointing at a database file on disk.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// In-memory database. Every test gets a fresh, empty schema.
    ///
    /// A single connection is forced: each SQLite `:memory:` connection
    /// is its own database, so a pool of two would see two schemas.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            max_connections: 1,
            ..Default::default()
        }
    }

    /// Override the maximum pool size.
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}

/// Main database handle.
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and runs any pending migrations.
    ///
    /// ## Process
    /// 1. Build SQLite connection options (WAL, foreign keys)
    /// 2. Create the connection pool
    /// 3. Apply embedded migrations
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        let options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
        }
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(path = %config.path.display(), "Database connected");

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Applies embedded schema migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        crate::migrations::run_migrations(&self.pool).await
    }

    /// Raw pool access for queries that don't fit a repository.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Participant storage.
    pub fn participants(&self) -> ParticipantRepository {
        ParticipantRepository::new(self.pool.clone())
    }

    /// Group storage.
    pub fn groups(&self) -> GroupRepository {
        GroupRepository::new(self.pool.clone())
    }

    /// Ledger entry storage.
    pub fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.pool.clone())
    }

    /// Verifies the database answers a trivial query.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(())
    }

    /// Closes the pool. Outstanding connections finish their work first.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_in_memory_and_passes_health_check() {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
        db.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
        // connect() already migrated; a second run must be a no-op.
        db.run_migrations().await.unwrap();
    }
}
