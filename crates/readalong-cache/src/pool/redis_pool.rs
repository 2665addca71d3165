//! deadpool-redis pool shared by the cache modules

use std::sync::Arc;

use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;

/// Pool settings, usually built from [`readalong_common::RedisConfig`]
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    pub url: String,
    pub max_connections: usize,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 10,
        }
    }
}

impl From<&readalong_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &readalong_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("No Redis connection available: {0}")]
    Checkout(#[from] deadpool_redis::PoolError),

    #[error("Redis command failed: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cached payload is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Cloneable handle to the Redis pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let create = |e: &dyn std::fmt::Display| RedisPoolError::CreatePool(e.to_string());
        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| create(&e))?
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| create(&e))?;

        tracing::info!(
            url = %redact_url(&config.url),
            max_connections = config.max_connections,
            "Redis pool created"
        );

        Ok(Self { pool })
    }

    pub fn from_config(config: &readalong_common::RedisConfig) -> RedisResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    /// Check out a connection
    pub async fn connection(&self) -> RedisResult<Connection> {
        Ok(self.pool.get().await?)
    }

    /// PING the server through the pool
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Decode the JSON stored in one hash field, `None` when the key or field is missing
    pub async fn hget_json<V: DeserializeOwned>(
        &self,
        key: &str,
        field: &str,
    ) -> RedisResult<Option<V>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.hget(key, field).await?;
        Ok(raw.as_deref().map(serde_json::from_str).transpose()?)
    }
}

pub type SharedRedisPool = Arc<RedisPool>;

/// Strip credentials from a connection URL before logging it
fn redact_url(url: &str) -> &str {
    match url.rsplit_once('@') {
        Some((_, host)) => host,
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_redis_config() {
        let redis_config = readalong_common::RedisConfig {
            url: "redis://localhost:6380".to_string(),
            max_connections: 32,
        };
        let pool_config = RedisPoolConfig::from(&redis_config);
        assert_eq!(pool_config.url, "redis://localhost:6380");
        assert_eq!(pool_config.max_connections, 32);
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(redact_url("redis://user:pw@cache:6379/0"), "cache:6379/0");
        assert_eq!(redact_url("redis://cache:6379"), "redis://cache:6379");
    }

    #[tokio::test]
    async fn test_pool_is_lazy() {
        // Nothing listens here; building the pool must not connect
        let pool = RedisPool::new(RedisPoolConfig {
            url: "redis://127.0.0.1:1".to_string(),
            max_connections: 2,
        })
        .unwrap();
        assert!(format!("{pool:?}").contains("available"));
    }
}
