use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

const IN_MEMORY_SQLITE: &str = "sqlite::memory:";

/// Establish a pooled connection to the database.
///
/// `SQLite` URLs get a single connection: an in-memory database lives and dies with
/// its connection, and file databases serialize writers anyway.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    if database_url.starts_with("sqlite:") {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(20)
            .min_connections(2)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800));
    }
    opts.connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Connect to a fresh in-memory `SQLite` database with every migration applied.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let db = connect(IN_MEMORY_SQLITE).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
