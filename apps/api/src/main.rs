//! # Kasir API server
//!
//! ```bash
//! DB_CONN=./kasir.db PORT=8080 cargo run -p kasir-api
//! ```

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kasir_api::{router, ApiConfig, AppState};
use kasir_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments use the environment.
    let dotenv = dotenvy::dotenv();

    init_tracing();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded .env file");
    }

    info!("Starting Kasir API server...");

    let config = ApiConfig::load()?;
    info!(
        addr = %config.socket_addr(),
        db_path = %config.db_path,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.db_path)
            .max_connections(config.db_max_connections)
            .busy_timeout(Duration::from_millis(config.db_busy_timeout_ms)),
    )
    .await
    .context("failed to open database")?;

    let app = router(AppState::new(db.clone()));

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.socket_addr()))?;
    info!(addr = %config.socket_addr(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,kasir_api=debug,kasir_db=debug,sqlx=warn,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
