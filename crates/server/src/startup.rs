use std::{future::IntoFuture, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use configs::{AppConfig, StorageBackend, StorageConfig};
use migration::{Migrator, MigratorTrait};
use rpc::RpcServer;
use service::{EmailGateway, EmailStore, MemoryEmailStore, SeaOrmEmailStore};

use crate::routes::{self, AppState};

/// Pick the storage implementation named by the config.
///
/// `database` connects to `storage.url` and applies pending migrations.
pub async fn build_store(cfg: &StorageConfig) -> anyhow::Result<Arc<dyn EmailStore>> {
    match cfg.backend {
        StorageBackend::Memory => {
            info!(backend = "memory", "email store ready");
            Ok(MemoryEmailStore::new())
        }
        StorageBackend::Database => {
            let db = models::db::connect_url(&cfg.url).await?;
            Migrator::up(&db, None).await.context("running migrations")?;
            info!(backend = "database", "email store ready");
            Ok(Arc::new(SeaOrmEmailStore::new(db)))
        }
    }
}

/// Assemble the HTTP router over an existing gateway.
pub fn build_app(gateway: EmailGateway) -> Router {
    routes::build_router(AppState::new(gateway))
}

/// Serve HTTP and RPC over one gateway until either listener fails.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let store = build_store(&cfg.storage).await?;
    let gateway = EmailGateway::new(store).with_timeout(cfg.call_timeout());

    let http_addr = cfg.http_addr();
    let http_listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("binding http listener on {http_addr}"))?;
    let rpc_listener = TcpListener::bind(&cfg.rpc.bind)
        .await
        .with_context(|| format!("binding rpc listener on {}", cfg.rpc.bind))?;

    info!(
        http = %http_listener.local_addr()?,
        rpc = %rpc_listener.local_addr()?,
        timeout_ms = cfg.gateway.call_timeout_ms,
        "starting email gateway"
    );

    let app = build_app(gateway.clone());
    let rpc_server = RpcServer::new(gateway).with_max_in_flight(cfg.rpc.max_in_flight);

    tokio::select! {
        res = axum::serve(http_listener, app).into_future() => {
            res.context("http server")?;
        }
        res = rpc_server.serve(rpc_listener) => {
            res.context("rpc server")?;
        }
    }
    Ok(())
}
