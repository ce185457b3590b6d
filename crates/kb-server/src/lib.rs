//! Local HTTP server for the KB viewer.
//!
//! Hosts one [`kb_site::Viewer`] per process and exposes it to a browser:
//! - `/`: Shell page with the current sidebar and main region
//! - `/assets/*`: Stylesheet and client script from `kb-assets`
//! - `/data/*`: Raw JSON documents from the content root
//! - `/api/view`, `/api/events`: Current view, and applying navigator events
//! - `/api/search?q=`: Subject-name filter
//!
//! # Architecture
//!
//! ```text
//! Browser ──click / hashchange──► POST /api/events
//!                                      │
//!                                      └─► Mutex<Viewer>::handle ──► View (JSON)
//! ```
//!
//! The viewer is single-session, so every request goes through one lock.
//!
//! # Quick Start
//!
//! ```ignore
//! use kb_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server(ServerConfig::default()).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use kb_storage::{FsStorage, Storage};
use kb_store::{FileStore, KeyValueStore, MemoryStore};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Root every document is fetched from.
    pub data_dir: PathBuf,
    /// Metadata path relative to `data_dir`.
    pub metadata_file: String,
    /// Directory for persisted progress; `None` keeps it in memory.
    pub store_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            data_dir: PathBuf::from("data"),
            metadata_file: "metadata.json".to_owned(),
            store_dir: None,
        }
    }
}

impl From<&kb_config::Config> for ServerConfig {
    fn from(config: &kb_config::Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            data_dir: config.content_resolved.data_dir.clone(),
            metadata_file: config.content_resolved.metadata_file.clone(),
            store_dir: config
                .store_resolved
                .enabled
                .then(|| config.store_resolved.dir.clone()),
        }
    }
}

/// Build the durable store for `store_dir`.
#[must_use]
pub fn open_store(store_dir: Option<PathBuf>) -> Arc<dyn KeyValueStore> {
    match store_dir {
        Some(dir) => Arc::new(FileStore::new(dir)),
        None => Arc::new(MemoryStore::new()),
    }
}

/// Run the server until Ctrl-C.
///
/// A metadata document that fails to load does not stop the server; every
/// page then shows the error.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.data_dir.clone()));
    let store = open_store(config.store_dir.clone());
    let state = Arc::new(AppState::new(storage, store, &config.metadata_file));

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, data_dir = %config.data_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
