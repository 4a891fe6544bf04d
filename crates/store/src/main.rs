use anyhow::Context;
use coursedb_store::{StoreConfig, db};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting coursedb schema migration");
    let config = StoreConfig::from_env().context("failed to load store configuration")?;

    let db = db::init_pool_and_migrate(&config)
        .await
        .context("failed to connect and migrate course database")?;
    db.close().await.context("failed to close database pool")?;

    info!("course database is up to date");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
