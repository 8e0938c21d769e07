use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, ServerConfig, StoreBackend, StoreConfig};
use tokio::net::TcpListener;
use service::storage::{DocumentStore, JsonFileStore, MemoryStore};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Bind the listener; `host` may be a name or an IP literal.
async fn bind(server: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind((server.host.as_str(), server.port))
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind {}:{}: {e}", server.host, server.port))?;
    Ok(listener)
}

/// Open the configured document store.
pub async fn open_store(cfg: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match cfg.backend {
        StoreBackend::Memory => {
            warn!("using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::File => {
            // open() creates the parent directory
            let store = JsonFileStore::open(&cfg.path).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Router with the default CORS policy over the given store.
pub fn app(store: Arc<dyn DocumentStore>) -> Router {
    routes::build_router(AppState::new(store), build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Public entry: open the configured store and run the HTTP server.
/// Logging and config loading are the caller's job.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store = open_store(&cfg.store).await?;
    let app = app(store);

    let listener = bind(&cfg.server).await?;
    let addr = listener.local_addr()?;
    info!(%addr, backend = ?cfg.store.backend, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
