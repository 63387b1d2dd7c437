//! Schema migrations.
//!
//! Migrations are the one place that needs the raw connection, so they run
//! here rather than through the scoped builders.

use sea_orm_migration::{MigrationTrait, MigratorTrait, SchemaManager};

use crate::DbError;
use crate::secure::Db;

/// Apply every pending migration of `M`.
///
/// # Errors
/// Returns [`DbError::Sea`] if a migration fails.
pub async fn run_migrations<M: MigratorTrait>(db: &Db) -> Result<(), DbError> {
    let conn = db.sea_internal();
    let pending = M::get_pending_migrations(conn).await?.len();
    tracing::info!(pending, engine = db.db_engine(), "applying migrations");
    M::up(conn, None).await?;
    Ok(())
}

/// Apply `migrations` in order, without a migration history table.
///
/// Intended for tests that define their own throwaway tables.
///
/// # Errors
/// Returns [`DbError::Sea`] if a migration fails.
pub async fn run_migrations_for_testing(
    db: &Db,
    migrations: Vec<Box<dyn MigrationTrait>>,
) -> Result<(), DbError> {
    let manager = SchemaManager::new(db.sea_internal());
    for migration in migrations {
        tracing::debug!(migration = migration.name(), "applying test migration");
        migration.up(&manager).await?;
    }
    Ok(())
}
