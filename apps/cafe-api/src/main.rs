//! # Cafe API
//!
//! Binary entry point: configuration, database, demo seed, HTTP server.

use std::net::SocketAddr;

use anyhow::Context;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cafe_api::{router, ApiConfig, AppState};
use cafe_db::{seed_demo, Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cafe=debug,sqlx=warn")),
        )
        .with_target(true)
        .init();

    info!("Starting Cafe API server...");

    // Load configuration
    let config = ApiConfig::load().context("invalid configuration")?;
    info!(
        port = config.port,
        db_path = %config.db_path.display(),
        seed_demo = config.seed_demo,
        "Configuration loaded"
    );

    // Open database (runs migrations)
    let db = Database::new(DbConfig::new(&config.db_path))
        .await
        .context("failed to open database")?;

    if config.seed_demo {
        let report = seed_demo(&db, Utc::now()).await?;
        info!(inserted = report.total(), "Demo network seeded");
    }

    let state = AppState::new(db.clone(), &config);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
