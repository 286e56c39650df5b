//! Database layer for the battlefield backend.
//!
//! Locations are stored relationally: the location row plus its vote tallies
//! and notes in child tables, and vote submissions in a standalone queue table.

/// Table models.
pub mod entities;
/// Schema migrations.
pub mod migrations;
/// Data access over the shared connection.
pub mod repositories;
/// Postgres helpers for integration tests.
pub mod test_utils;

use battlefield_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);
    let op_timeout = Duration::from_secs(config.database.operation_timeout_secs);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(op_timeout)
        .acquire_timeout(op_timeout)
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
