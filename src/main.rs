//! Expense tracker - application entry point.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the credential store
//! 3. Open the record store (SQLite pool + table) unless running in memory
//! 4. Build the HTTP router
//! 5. Serve until Ctrl-C, then close the store

use gastos_malharia::{
    config::{Config, StorageMode},
    services::record_store::SqliteStore,
    state::{AppState, Storage},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(storage = ?config.storage, "Configuration loaded");

    let credentials = config.credentials()?;
    tracing::info!(users = credentials.len(), "Credentials loaded");

    let storage = match config.storage {
        StorageMode::Sqlite => {
            let store = SqliteStore::open(&config.database_url).await?;
            tracing::info!(url = %config.database_url, "Database ready");
            Storage::Durable(store)
        }
        StorageMode::Memory => {
            tracing::info!("Records are kept in memory per session");
            Storage::Ephemeral
        }
    };

    let app = gastos_malharia::app(AppState::new(credentials, storage.clone()));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Storage::Durable(store) = storage {
        store.close().await;
        tracing::info!("Database closed");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
    tracing::info!("Shutting down");
}
