use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, DatabaseConfig, MEMORY_URL_PREFIX};
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::band::repository::{BandRepository, MemoryBandRepository, SeaOrmBandRepository};
use service::storage::memory_band_store::MemoryBandStore;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Construct the band store named by `database.url`.
///
/// `memory://` keeps bands in process; `memory://<path>` mirrors them to a JSON
/// file. Anything else is a Postgres URL, migrated up before use.
pub async fn build_repository(cfg: &DatabaseConfig) -> Result<Arc<dyn BandRepository>, StartupError> {
    if cfg.is_memory() {
        let path = cfg.url.trim()[MEMORY_URL_PREFIX.len()..].trim();
        let repo = if path.is_empty() {
            info!(store = "memory", "band store ready");
            MemoryBandRepository::new()
        } else {
            let store = MemoryBandStore::with_file(path)
                .await
                .map_err(|e| StartupError::Store(e.to_string()))?;
            info!(store = "memory", file = %path, "band store ready");
            MemoryBandRepository { store }
        };
        return Ok(Arc::new(repo));
    }

    let db = models::db::connect_with_config(cfg)
        .await
        .map_err(|e| StartupError::Store(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Store(format!("migration failed: {e}")))?;
    info!(store = "postgres", "band store ready");
    Ok(Arc::new(SeaOrmBandRepository { db }))
}

/// Build the application router over an already constructed store.
pub fn build_app(repo: Arc<dyn BandRepository>) -> Router {
    routes::build_router(ServerState::new(repo), build_cors())
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    cfg.bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.bind_addr())))
}

/// Public entry: build the store and router, then serve until the future resolves
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let repo = build_repository(&cfg.database).await?;
    let app = build_app(repo);

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "server running");
    axum::serve(listener, app).await?;
    Ok(())
}
