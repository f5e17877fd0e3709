use anyhow::Result;
use inventory_tracker::config::Config;
use inventory_tracker::storage::sqlite::SqliteStore;
use inventory_tracker::{web, Inventory};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,sea_orm=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = SqliteStore::connect(config.database_url(), *config.max_connections()).await?;
    let inventory = Arc::new(Inventory::new(store));

    let seeded = inventory.initialize().await?;
    info!(
        database = %config.database_url(),
        seeded,
        "inventory database ready"
    );

    web::serve(config.socket_addr(), inventory).await
}
