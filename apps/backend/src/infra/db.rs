use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;

/// Connect to `url` and bring the schema up to date.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(url.to_owned());
    opts.sqlx_logging(false);
    // A private SQLite memory database lives and dies with its connection.
    if url.starts_with("sqlite::memory:") {
        opts.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(opts).await?;
    info!(backend = ?conn.get_database_backend(), "database connected");
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
