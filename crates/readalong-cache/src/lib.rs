//! # readalong-cache
//!
//! Redis layer: a managed connection pool and the reading progress cache.
//!
//! ## Example
//!
//! ```ignore
//! use readalong_cache::{RedisPool, RedisPoolConfig, RedisProgressCache};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let cache = RedisProgressCache::new(pool, 300);
//! cache.put(&progress).await?;
//! ```

pub mod pool;
pub mod progress;

// Re-export pool types
pub use pool::{
    RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

pub use progress::{progress_key, RedisProgressCache, PROGRESS_PREFIX};
