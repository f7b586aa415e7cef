//! Throwaway SQLite databases with the room schema applied.

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Connect to a private in-memory SQLite database and run all migrations.
///
/// The pool is pinned to one connection: every new SQLite `:memory:`
/// connection would otherwise see its own empty database.
pub async fn sqlite_memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("connect to in-memory sqlite");
    migrate(&db, MigrationCommand::Up)
        .await
        .expect("apply migrations to in-memory sqlite");
    db
}
