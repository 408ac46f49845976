use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;

/// Open the process-wide connection pool and bring the schema up to date.
///
/// Connections are checked out per query and returned to the pool when the
/// query future completes or is dropped, so no request holds one across
/// requests.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("imagehost_server::entity::*")
        .sync(&db)
        .await?;
    info!(backend = ?db.get_database_backend(), "Database schema synchronized");

    Ok(db)
}
