//! # Schema Migrations
//!
//! Migration SQL lives in `migrations/sqlite/` at the workspace root and
//! is embedded into the binary at compile time. sqlx tracks applied
//! migrations in its own `_sqlx_migrations` table, so running them twice
//! is safe.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrator. Path is relative to this crate's manifest.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!("Migrations applied");
    Ok(())
}

/// Lists embedded migration versions and descriptions, for diagnostics.
pub fn migration_status() -> Vec<(i64, String)> {
    MIGRATOR
        .iter()
        .map(|m| (m.version, m.description.to_string()))
        .collect()
}
