//! fanshelf-ui - FanShelf favorites hub service
//!
//! Single HTTP service backing the FanShelf frontend: favorites
//! persistence over SQLite, identity resolution for sports records,
//! collection statistics, and browse proxies over the upstream movie and
//! sports APIs. Default port 5730.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

use fanshelf_common::config::{self, TomlConfig};
use fanshelf_ui::config::ApiKeys;
use fanshelf_ui::{build_router, AppState};

/// Command-line arguments for fanshelf-ui
#[derive(Parser, Debug)]
#[command(name = "fanshelf-ui")]
#[command(about = "Favorites hub service for FanShelf")]
#[command(version)]
struct Args {
    /// Root folder for application data (falls back to FANSHELF_ROOT_FOLDER,
    /// then the config file, then the OS data directory)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on (default from config file, else 5730)
    #[arg(short, long, env = "FANSHELF_PORT")]
    port: Option<u16>,

    /// Path to the SQLite database file (default: fanshelf.db in the root folder)
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately, before any database delays
    info!(
        "Starting FanShelf favorites hub (fanshelf-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml_config = TomlConfig::load_default();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    let db_path = args
        .database
        .or_else(|| toml_config.database_path.clone())
        .unwrap_or_else(|| config::database_path(&root_folder));
    info!("Database: {}", db_path.display());

    let db = fanshelf_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;
    info!("✓ Database connection established");

    let keys = ApiKeys::resolve(&db, &toml_config)
        .await
        .context("Failed to resolve API keys")?;
    if keys.omdb.is_none() {
        warn!("No OMDB API key configured; movie browse and enrichment will fail");
    }
    if keys.sports.is_none() {
        warn!("No api-sports key configured; football and basketball browse will fail");
    }

    let state = AppState::new(db, &keys).context("Failed to construct upstream clients")?;
    let app = build_router(state);

    let port = args.port.unwrap_or(toml_config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("fanshelf-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
