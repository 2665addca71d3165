//! PostgreSQL implementation of LikeRepository

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use readalong_core::entities::{LikeAction, LikeState};
use readalong_core::traits::{LikeRepository, RepoResult};
use readalong_core::value_objects::Snowflake;

use super::error::{comment_not_found, map_db_error};

/// PostgreSQL implementation of LikeRepository
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    /// Runs in one transaction holding a row lock on the comment, so concurrent writes to
    /// the same comment's likes are applied one at a time and the count read back is the
    /// count this write produced.
    #[instrument(skip(self))]
    async fn apply(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        action: LikeAction,
    ) -> RepoResult<LikeState> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let locked = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM comments WHERE id = $1 FOR NO KEY UPDATE",
        )
        .bind(comment_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if locked.is_none() {
            return Err(comment_not_found(comment_id));
        }

        let current = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM comment_likes WHERE comment_id = $1 AND user_id = $2)",
        )
        .bind(comment_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let liked = action.apply(current);
        if liked && !current {
            sqlx::query(
                r#"
                INSERT INTO comment_likes (comment_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (comment_id, user_id) DO NOTHING
                "#,
            )
            .bind(comment_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        } else if !liked && current {
            sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2")
                .bind(comment_id.into_inner())
                .bind(user_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        let like_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1",
        )
        .bind(comment_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(LikeState::new(liked, like_count))
    }

    #[instrument(skip(self, comment_ids), fields(count = comment_ids.len()))]
    async fn liked_comment_ids(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashSet<Snowflake>> {
        if comment_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i64> = comment_ids.iter().map(|id| id.into_inner()).collect();
        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT comment_id
            FROM comment_likes
            WHERE user_id = $1 AND comment_id = ANY($2)
            "#,
        )
        .bind(user_id.into_inner())
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }
}
