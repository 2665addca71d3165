//! Cache port for reading progress

use async_trait::async_trait;

use crate::entities::ReadingProgress;
use crate::traits::RepoResult;
use crate::value_objects::Snowflake;

/// Read-through cache for progress records.
///
/// Implementations must never let an older record replace a newer one. Only progress
/// is cached; visibility is always computed from the current record.
#[async_trait]
pub trait ProgressCache: Send + Sync {
    async fn get(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Option<ReadingProgress>>;

    /// Store a record unless a newer one is already cached
    async fn put(&self, progress: &ReadingProgress) -> RepoResult<()>;

    /// Evict the cached record for `progress`'s key.
    ///
    /// The key keeps `progress.updated_at` as a watermark until it expires, so `put` still
    /// refuses records older than the eviction.
    async fn invalidate(&self, progress: &ReadingProgress) -> RepoResult<()>;
}
