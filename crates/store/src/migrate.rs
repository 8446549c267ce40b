//! Embedded schema migrations.
//!
//! Migrations are ordered SQL files under `migrations/`, embedded at build
//! time. sqlx records applied versions in `_sqlx_migrations`, so running the
//! sequence again is a no-op and the live schema always matches exactly one
//! recorded version.

use sqlx::PgPool;
use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply all unapplied migrations in order.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
