use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use crate::error::AppResult;

// journal_mode persists in the database file; per-connection pragmas do not
const PRAGMAS: [&str; 1] = ["PRAGMA journal_mode=WAL"];

/// Opens the database and brings the schema up to date. Must run once before
/// the server accepts requests.
pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let in_memory = database_url.contains(":memory:");

    let mut opt = ConnectOptions::new(database_url.to_string());
    opt.sqlx_logging(false);
    if in_memory {
        // every pooled connection would otherwise see its own empty database
        opt.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opt).await?;

    if !in_memory {
        for pragma in PRAGMAS {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;
    info!(database_url, "database connected, migrations applied");

    Ok(db)
}
