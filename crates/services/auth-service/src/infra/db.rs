//! Postgres connection for the credential store.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use super::migrations::Migrator;

/// Pool size for the credential store
const MAX_CONNECTIONS: u32 = 10;

/// Open a connection pool and apply pending migrations.
///
/// Connecting and acquiring a pooled connection are both bounded by
/// `store_timeout`.
pub async fn connect(database_url: &str, store_timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(MAX_CONNECTIONS)
        .connect_timeout(store_timeout)
        .acquire_timeout(store_timeout)
        .sqlx_logging(false);

    let connection = Database::connect(options).await?;
    Migrator::up(&connection, None).await?;
    tracing::info!(max_connections = MAX_CONNECTIONS, "Credential store connected, schema up to date");

    Ok(connection)
}
