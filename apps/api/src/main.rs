mod config;
mod errors;
mod export;
mod models;
mod notify;
mod routes;
mod sections;
mod skills;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::export::{Exporter, FilePrintTarget, InlinePrintTarget};
use crate::notify::TracingNotifier;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::file::FileStorage;
use crate::store::memory::MemoryStorage;
use crate::store::postgres::PgStorage;
use crate::store::redis::RedisStorage;
use crate::store::{KeyValueStorage, ProfileStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    let storage = open_storage(&config).await?;
    info!("Storage backend: {}", storage.backend_name());

    let store = ProfileStore::load(storage).await;

    // Printing to a file first; the inline target hands the HTML back to the caller.
    let exporter = Exporter::new(
        Arc::new(FilePrintTarget::new(config.export_dir.clone())),
        Arc::new(InlinePrintTarget),
        Arc::new(TracingNotifier),
    );

    let state = AppState::new(store, exporter);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_storage(config: &Config) -> Result<Arc<dyn KeyValueStorage>> {
    let storage: Arc<dyn KeyValueStorage> = match &config.storage {
        StorageBackend::Memory => Arc::new(MemoryStorage::default()),
        StorageBackend::File => Arc::new(FileStorage::open(&config.storage_dir).await?),
        StorageBackend::Postgres { database_url } => Arc::new(PgStorage::connect(database_url).await?),
        StorageBackend::Redis { redis_url } => {
            let client = redis::Client::open(redis_url.as_str())?;
            info!("Redis client initialized");
            Arc::new(RedisStorage::connect(&client).await?)
        }
    };
    Ok(storage)
}
