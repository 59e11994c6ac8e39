use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use paperfolio_backend::app::create_app;
use paperfolio_backend::external::twelvedata::TwelveDataProvider;
use paperfolio_backend::logging::{init_logging, LoggingConfig};
use paperfolio_backend::services::engine::PortfolioEngine;
use paperfolio_backend::services::quotes::{QuoteCache, QuoteService};
use paperfolio_backend::state::AppState;
use paperfolio_backend::store::{MemoryStore, PgStore, PortfolioStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env())?;

    let store: Arc<dyn PortfolioStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&url)
                .await
                .context("failed to connect to Postgres")?;
            sqlx::migrate!().run(&pool).await?;
            tracing::info!("Using Postgres store");
            Arc::new(PgStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (state is not durable)");
            Arc::new(MemoryStore::new())
        }
    };
    let engine = Arc::new(PortfolioEngine::new(store));

    let provider = Arc::new(
        TwelveDataProvider::from_env()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("failed to create price provider")?,
    );
    let quote_ttl_secs: i64 = std::env::var("QUOTE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);
    let quotes = Arc::new(QuoteService::new(
        provider,
        QuoteCache::new(Duration::seconds(quote_ttl_secs)),
    ));

    let app = create_app(AppState { engine, quotes });

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
