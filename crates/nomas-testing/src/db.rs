use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite database with every migration of `M` applied.
///
/// The pool is capped at one connection: each SQLite `:memory:` connection
/// is its own database.
pub async fn memory_db<M: MigratorTrait>() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("failed to open in-memory sqlite");
    M::up(&db, None)
        .await
        .expect("failed to migrate in-memory sqlite");
    db
}
