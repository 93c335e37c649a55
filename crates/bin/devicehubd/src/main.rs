//! # devicehubd: device hub daemon
//!
//! Composition root that wires the adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`devicehub.toml` plus environment overrides)
//! - Install the `tracing` subscriber
//! - Open the `SQLite` pool and run migrations
//! - Build the repository, the device service and the axum router
//! - Serve until Ctrl-C or SIGTERM, then drain in-flight requests
//!
//! ## Dependency rule
//! This is the **only** crate that depends on every other crate.
//! No domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devicehub_adapter_http_axum::state::AppState;
use devicehub_adapter_storage_sqlite_sqlx::SqliteDeviceRepository;
use devicehub_app::services::device_service::DeviceService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let db = devicehub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await
    .with_context(|| format!("opening database {}", config.database.url))?;

    let device_service = DeviceService::new(SqliteDeviceRepository::new(db.pool().clone()));
    let app = devicehub_adapter_http_axum::router::build(AppState::new(device_service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(address = %bind_addr, "devicehubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("devicehubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
