use std::sync::Arc;

use milan_api::config::{AppConfig, StorageBackend};
use milan_api::events::EventBus;
use milan_api::repository::{MemoryStore, PgStore, Store};
use milan_api::{app, jobs, AppState};
use milan_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    milan_shared::middleware::init_tracing("milan-api");

    let config = AppConfig::load()?;
    let port = config.port;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_pool_size)?;
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let events = EventBus::connect(config.rabbitmq_url.as_deref()).await;
    let metrics = milan_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState { store, config, events, metrics });

    jobs::spawn_membership_sweep(state.clone());
    jobs::spawn_view_cleanup(state.clone());

    let router = app(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "milan-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
