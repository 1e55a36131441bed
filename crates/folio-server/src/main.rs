//! Folio server entry point.
//!
//! Loads configuration, builds the document store and shared state, then
//! starts the Axum HTTP server with graceful shutdown. The store connects
//! lazily on the first request that needs it.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use folio_server::build_router;
use folio_server::config::{ServerConfig, StorageKind};
use folio_server::state::AppState;
use folio_storage::{DocumentStore, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("invalid configuration")?;

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        storage = ?config.storage,
        secret_source = ?config.secret_source,
        "Folio starting"
    );

    let store = build_store(&config)?;
    let state = Arc::new(AppState::new(store, &config));
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Folio server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Folio server stopped");
    Ok(())
}

/// Construct the configured document store. Performs no I/O.
fn build_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.storage {
        StorageKind::Memory => {
            info!("using in-memory storage (data will not persist)");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "mongodb-backend")]
        StorageKind::MongoDb => {
            info!(
                database = %config.database,
                collection = %config.collection,
                uri = if config.store_uri.is_some() { "[redacted]" } else { "unset" },
                "using MongoDB storage"
            );
            Ok(Arc::new(folio_storage::MongoStore::new(
                folio_storage::MongoSettings {
                    uri: config.store_uri.clone(),
                    database: config.database.clone(),
                    collection: config.collection.clone(),
                    connect_timeout: config.connect_timeout,
                },
            )))
        }
        #[cfg(not(feature = "mongodb-backend"))]
        StorageKind::MongoDb => {
            anyhow::bail!("MongoDB backend requested but feature 'mongodb-backend' is not enabled");
        }
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
