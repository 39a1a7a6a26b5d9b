use anyhow::{Context, Result};
use diesel::{Connection, PgConnection};
use diesel_async::{AsyncPgConnection, pooled_connection::AsyncDieselConnectionManager};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness};

use super::aliases::DbPool;

/// Builds the bb8 pool every request handler draws connections from.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    DbPool::builder()
        .build(manager)
        .await
        .context("Failed to build the DB connection pool")
}

/// Pool that connects on first use. Lets router tests build an [`AppState`](super::app_state::AppState)
/// without a running database.
#[cfg(test)]
pub fn lazy_pool(database_url: &str) -> DbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    DbPool::builder().build_unchecked(manager)
}

/// Runs pending migrations on a blocking thread, since the migration harness is synchronous.
/// Returns the number of migrations applied.
pub async fn run_migrations_blocking(
    migrations: EmbeddedMigrations,
    database_url: &str,
) -> Result<usize> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .context("Failed to connect to the database for migrations")?;
        let applied = conn
            .run_pending_migrations(migrations)
            .map_err(|err| anyhow::anyhow!("Failed to run migrations: {err}"))?;
        Ok(applied.len())
    })
    .await
    .context("Migration task panicked")?
}
