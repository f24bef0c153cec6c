use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dht22_telemetry::{
    api,
    config::Config,
    db::{self, MemoryReadingStore, PgReadingStore, SharedStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; variables may come from the environment
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store = connect_store(&config).await?;

    // Start HTTP server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Open the reading store named by `DATABASE_URL`, running migrations for Postgres.
async fn connect_store(config: &Config) -> Result<SharedStore> {
    if config.uses_memory_store() {
        warn!("Using in-memory reading store; readings are lost on shutdown");
        return Ok(Arc::new(MemoryReadingStore::new()));
    }

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database ready");

    Ok(Arc::new(PgReadingStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
