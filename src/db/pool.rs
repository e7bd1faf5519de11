use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::config::Config;
use crate::db::DbError;

/// Open the shared pool for the process lifetime.
///
/// The store is opened read-only unless schema initialization was requested,
/// in which case the database file is created if it does not exist yet.
pub async fn connect(config: &Config) -> Result<SqlitePool, DbError> {
    connect_with(
        &config.database_url,
        config.database_max_connections,
        config.database_init_schema,
    )
    .await
}

/// Open a pool from a bare connection string
#[instrument]
pub async fn connect_with(
    database_url: &str,
    max_connections: u32,
    writable: bool,
) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .read_only(!writable)
        .create_if_missing(writable);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    info!(read_only = !writable, "Database pool established");
    Ok(pool)
}

/// Apply the bundled schema. Tables are created only when missing.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}
