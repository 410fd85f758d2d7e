//! # Storefront Server Entry Point
//!
//! ```text
//! storefront [--config <path> | <path>]
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging (RUST_LOG, default info,storefront=debug)       │
//! │  2. Load config: defaults → storefront.toml → STOREFRONT_* env         │
//! │  3. Build the catalog: fixture file, or the live content API           │
//! │  4. Build state + router, start the session purge task                 │
//! │  5. Serve until Ctrl+C / SIGTERM, then shut down gracefully            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use storefront_web::config::StorefrontConfig;
use storefront_web::{build_catalog, build_router, build_state, init_tracing, spawn_session_purge};

/// Config path from `--config <path>` or a bare first argument.
fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    match args.next()?.as_str() {
        "--config" | "-c" => args.next().map(PathBuf::from),
        path => Some(PathBuf::from(path)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting storefront server...");

    let config = StorefrontConfig::load(config_path_from_args()).context("Failed to load configuration")?;
    info!(
        port = config.server.port,
        project = %config.content.project_id,
        dataset = %config.content.dataset,
        fixture = ?config.content.fixture_path,
        "Configuration loaded"
    );

    let catalog = build_catalog(&config)
        .await
        .context("Failed to initialize the catalog")?;

    let state = build_state(&config, catalog);
    let purge = spawn_session_purge(state.sessions.clone(), &config.session);
    let app = build_router(state);

    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!(addr = %bind_addr, "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    purge.abort();
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
