use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod health;
mod metrics;
mod state;
mod store;
mod utils;

use config::{AppConfig, StoreBackend};
use metrics::Metrics;
use state::AppState;
use store::{MemoryStore, PgStore, Store};
use utils::{retry_on_transient, RetryConfig, RetryResult};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,qmanage=debug"))
        )
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    tracing::info!(
        env = %config.app_env,
        production = config.is_production(),
        backend = ?config.store_backend,
        "🚀 Starting qmanage"
    );

    // === 1. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 2. Store ===
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => Arc::new(connect_postgres(&config, &metrics).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // === 3. HTTP server ===
    let state = web::Data::new(AppState::new(store, metrics.clone()));
    let metrics_data = web::Data::from(metrics);

    tracing::info!("✅ Listening on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(metrics_data.clone())
            .wrap(middleware::from_fn(metrics::track_requests))
            .wrap(middleware::Logger::default())
            .configure(api::configure)
            .configure(metrics::configure)
            .configure(health::configure)
            .default_service(web::to(api::not_found))
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

/// Connect with backoff on transient errors, then make sure the schema exists.
async fn connect_postgres(config: &AppConfig, metrics: &Metrics) -> anyhow::Result<PgStore> {
    tracing::info!("Connecting to PostgreSQL...");

    let retry = RetryConfig::with_attempts(config.db_connect_attempts);
    let result = retry_on_transient("db_connect", retry, |attempt| {
        metrics.record_retry_attempt("db_connect", attempt);
        PgStore::connect(&config.database_url, config.db_max_connections)
    })
    .await;

    metrics.record_retry_outcome("db_connect", matches!(result, RetryResult::Success(_)));
    let store = result
        .into_result()
        .context("Failed to connect to PostgreSQL")?;

    store
        .ensure_schema()
        .await
        .context("Failed to create database schema")?;

    tracing::info!("✅ Connected to PostgreSQL");
    Ok(store)
}
