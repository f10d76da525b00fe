use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use villa_pricing::cache::SeasonCache;
use villa_pricing::config::Config;
use villa_pricing::pricing::PgSeasonStore;
use villa_pricing::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Connect lazily; quotes fall back to default pricing while the database is unreachable
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    let cache = SeasonCache::new(Arc::new(PgSeasonStore::new(pool)), config.season_cache_ttl);
    cache.warm().await;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Villa pricing service listening on {}", config.bind_addr);

    axum::serve(listener, app(AppState { cache })).await?;

    Ok(())
}
