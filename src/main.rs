mod auth;
mod backend;
mod config;
mod db;
mod decision;
mod error;
mod navigation;
mod routes;
mod state;
mod storage;
mod templates;
mod validation;

use std::sync::Arc;

use crate::backend::LocalBackend;
use crate::config::SessionStorage;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confman=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;

    let storage: Arc<dyn KeyValueStore> = match config.session_storage {
        SessionStorage::File => {
            crate::storage::ensure_dirs(&config.state_dir)?;
            let store = FileStore::open(config.local_storage_path())?;
            tracing::info!("Persisting sessions to {}", store.path().display());
            Arc::new(store)
        }
        SessionStorage::Memory => Arc::new(MemoryStore::new()),
    };

    let backend = LocalBackend::seeded(config.seed_demo_data)
        .with_latency(config.simulated_latency);

    let state = Arc::new(state::AppState {
        backend: Arc::new(backend),
        storage,
    });

    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Conference management listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
