use coursedb_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::StoreConfig;

pub async fn connect(config: &StoreConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(config.connect_timeout)
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options).await?;
    info!(max_connections = config.max_connections, "database connected");

    Ok(db)
}

pub async fn init_pool_and_migrate(config: &StoreConfig) -> anyhow::Result<DatabaseConnection> {
    let db = connect(config).await?;

    Migrator::up(&db, None).await?;
    info!("course schema migrations applied");

    Ok(db)
}
