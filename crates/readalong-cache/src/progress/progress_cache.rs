//! Reading progress records cached in Redis hashes.
//!
//! Each key holds the JSON record in `payload` and its `updated_at` in microseconds. Writes
//! go through a Lua script that compares timestamps, so a slow writer carrying an older
//! record cannot overwrite a newer one. Invalidation drops only the payload and keeps the
//! timestamp as a watermark.

use async_trait::async_trait;
use readalong_core::entities::ReadingProgress;
use readalong_core::error::DomainError;
use readalong_core::traits::{ProgressCache, RepoResult};
use readalong_core::Snowflake;
use redis::Script;
use tracing::{debug, instrument};

use crate::pool::{RedisPool, RedisPoolError};

/// Key prefix for progress records
pub const PROGRESS_PREFIX: &str = "progress:";

const PAYLOAD_FIELD: &str = "payload";

/// KEYS[1] = record key; ARGV = payload, updated_at micros, ttl seconds.
/// Returns 1 when written, 0 when a newer record is already cached.
const PUT_IF_NEWER: &str = r"
local current = redis.call('HGET', KEYS[1], 'updated_at')
if current and tonumber(current) > tonumber(ARGV[2]) then
    return 0
end
redis.call('HSET', KEYS[1], 'payload', ARGV[1], 'updated_at', ARGV[2])
redis.call('EXPIRE', KEYS[1], tonumber(ARGV[3]))
return 1
";

/// KEYS[1] = record key; ARGV = updated_at micros, ttl seconds.
/// Drops the payload and raises the stored `updated_at` to at least ARGV[1].
const EVICT_KEEPING_WATERMARK: &str = r"
local current = redis.call('HGET', KEYS[1], 'updated_at')
local watermark = ARGV[1]
if current and tonumber(current) > tonumber(ARGV[1]) then
    watermark = current
end
redis.call('HDEL', KEYS[1], 'payload')
redis.call('HSET', KEYS[1], 'updated_at', watermark)
redis.call('EXPIRE', KEYS[1], tonumber(ARGV[2]))
return 1
";

/// Build the cache key for one reader's progress on one book
#[must_use]
pub fn progress_key(user_id: Snowflake, group_id: Snowflake, book_id: Snowflake) -> String {
    format!("{PROGRESS_PREFIX}{user_id}:{group_id}:{book_id}")
}

fn cache_error(e: RedisPoolError) -> DomainError {
    DomainError::CacheError(e.to_string())
}

/// Redis-backed `ProgressCache`
#[derive(Clone)]
pub struct RedisProgressCache {
    pool: RedisPool,
    ttl_seconds: u64,
    put_script: Script,
    evict_script: Script,
}

impl std::fmt::Debug for RedisProgressCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisProgressCache")
            .field("pool", &self.pool)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl RedisProgressCache {
    #[must_use]
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            pool,
            ttl_seconds,
            put_script: Script::new(PUT_IF_NEWER),
            evict_script: Script::new(EVICT_KEEPING_WATERMARK),
        }
    }
}

#[async_trait]
impl ProgressCache for RedisProgressCache {
    #[instrument(skip(self))]
    async fn get(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Option<ReadingProgress>> {
        self.pool
            .hget_json(&progress_key(user_id, group_id, book_id), PAYLOAD_FIELD)
            .await
            .map_err(cache_error)
    }

    #[instrument(skip(self, progress), fields(user_id = %progress.user_id, book_id = %progress.book_id))]
    async fn put(&self, progress: &ReadingProgress) -> RepoResult<()> {
        let key = progress_key(progress.user_id, progress.group_id, progress.book_id);
        let payload = serde_json::to_string(progress)
            .map_err(|e| cache_error(RedisPoolError::Serialization(e)))?;

        let mut conn = self.pool.connection().await.map_err(cache_error)?;
        let written: i32 = self
            .put_script
            .key(&key)
            .arg(payload)
            .arg(progress.updated_at.timestamp_micros())
            .arg(self.ttl_seconds)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| cache_error(RedisPoolError::Redis(e)))?;

        if written == 0 {
            debug!(key = %key, "Newer progress already cached");
        }
        Ok(())
    }

    #[instrument(skip(self, progress), fields(user_id = %progress.user_id, book_id = %progress.book_id))]
    async fn invalidate(&self, progress: &ReadingProgress) -> RepoResult<()> {
        let key = progress_key(progress.user_id, progress.group_id, progress.book_id);

        let mut conn = self.pool.connection().await.map_err(cache_error)?;
        let _: i32 = self
            .evict_script
            .key(&key)
            .arg(progress.updated_at.timestamp_micros())
            .arg(self.ttl_seconds)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| cache_error(RedisPoolError::Redis(e)))?;
        Ok(())
    }
}
