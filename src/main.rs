//! barber-desk server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use barber_desk::app_state::AppState;
use barber_desk::config::{AppConfig, LogFormat};
use barber_desk::store::{Backend, MemoryBackend, PostgresBackend, RecordStore, fallback_dataset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting barber-desk");

    // Build store layer
    let primary = match &config.database_url {
        Some(url) => Some(connect(&config, url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, running in demo mode on the built-in dataset");
            None
        }
    };
    let fallback = (config.fallback_enabled || primary.is_none())
        .then(|| MemoryBackend::with_dataset(fallback_dataset()));
    let store = RecordStore::new(primary, fallback, config.backend_timeout());
    tracing::info!(mode = ?store.mode(), fallback = store.fallback_enabled(), "record store ready");

    // Build router
    let app = barber_desk::build_app(AppState::new(store), config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Creates the PostgreSQL backend. The pool connects lazily, so an
/// unreachable database at startup only routes calls to the fallback.
async fn connect(config: &AppConfig, url: &str) -> anyhow::Result<Arc<dyn Backend>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect_lazy(url)
        .context("invalid DATABASE_URL")?;
    let backend = PostgresBackend::new(pool);
    match backend.migrate().await {
        Ok(()) => tracing::info!("database migrations applied"),
        Err(err) => tracing::warn!(error = %err, "could not apply migrations, continuing"),
    }
    Ok(Arc::new(backend))
}
