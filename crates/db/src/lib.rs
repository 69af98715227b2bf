//! SQLite storage layer for the Candid photo-trading backend.
//!
//! Exposes the connection pool, embedded migrations, `models/` row structs
//! and `repositories/` with async CRUD methods. All SQL lives here; the
//! engine crate never writes queries of its own.

pub mod models;
pub mod repositories;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Connection pool alias used across the workspace.
pub type DbPool = SqlitePool;

/// Embedded migrations. `connect` does not apply them; call
/// [`run_migrations`] once at startup (`#[sqlx::test]` applies them itself).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Open a pool on `database_url`, creating the database file if missing.
///
/// WAL keeps readers unblocked while a settlement transaction is writing;
/// foreign keys are enforced per connection; the busy timeout absorbs
/// writer contention instead of surfacing `SQLITE_BUSY`.
pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!(url = %database_url, "database pool opened");
    Ok(pool)
}

/// Apply any pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    MIGRATOR.run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}

/// Cheap connectivity probe for readiness checks.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
