//! blog-cms server entry point.
//!
//! Starts the Axum HTTP server with the JSON API and the HTML pages.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use blog_cms::config::{BlogConfig, LogFormat};
use blog_cms::routing;
use blog_cms::store::{BlogStore, MemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config =
        BlogConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        addr = %config.listen_addr,
        delete_policy = %config.author_delete_policy,
        "starting blog-cms"
    );

    // Build persistence layer
    let store: Arc<dyn BlogStore> = match &config.database {
        Some(database) => {
            let store = PostgresStore::connect(database, config.author_delete_policy)
                .await
                .context("failed to connect to PostgreSQL")?;
            if config.run_migrations {
                store.migrate().await.context("failed to apply migrations")?;
                tracing::info!("database migrations applied");
            }
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL unset or persistence disabled; using in-memory store");
            Arc::new(MemoryStore::new(config.author_delete_policy))
        }
    };

    // Build router
    let app = routing::app(store, &config).context("failed to compile page templates")?;

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
