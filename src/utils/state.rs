use std::str::FromStr;

use dashmap::DashMap;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::models::cache::CacheEntry;
use crate::utils::config::Config;
use crate::utils::rate_limiter::RateLimiter;

pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub news_cache: DashMap<String, CacheEntry<Value>>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub async fn init(config: Config) -> Result<Self, sqlx::Error> {
        let connect_options = PgConnectOptions::from_str(&config.db_url)?;
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(10))
            .idle_timeout(Some(std::time::Duration::from_secs(60)))
            .connect_with(connect_options)
            .await?;

        Ok(Self::with_pool(db_pool, config))
    }

    /// Build state around an existing pool. Tests use this with a lazy
    /// pool so no database is needed until a query actually runs.
    pub fn with_pool(db_pool: PgPool, config: Config) -> Self {
        AppState {
            db_pool,
            config,
            news_cache: DashMap::new(),
            rate_limiter: RateLimiter::new(64, 0),
        }
    }
}
