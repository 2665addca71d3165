//! PostgreSQL implementation of ProgressRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use readalong_core::entities::ReadingProgress;
use readalong_core::error::DomainError;
use readalong_core::traits::{ProgressRepository, RepoResult};
use readalong_core::value_objects::Snowflake;

use crate::mappers::ProgressInsert;
use crate::models::ProgressModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ProgressRepository
#[derive(Clone)]
pub struct PgProgressRepository {
    pool: PgPool,
}

impl PgProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressRepository for PgProgressRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Option<ReadingProgress>> {
        let result = sqlx::query_as::<_, ProgressModel>(
            r#"
            SELECT user_id, group_id, book_id, current_page, total_pages, updated_at
            FROM reading_progress
            WHERE user_id = $1 AND group_id = $2 AND book_id = $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(group_id.into_inner())
        .bind(book_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReadingProgress::try_from).transpose()
    }

    #[instrument(skip(self, progress), fields(user_id = %progress.user_id, book_id = %progress.book_id))]
    async fn upsert(&self, progress: &ReadingProgress) -> RepoResult<ReadingProgress> {
        let insert = ProgressInsert::new(progress);

        // The WHERE clause keeps a newer stored row; nothing is returned in that case
        let written = sqlx::query_as::<_, ProgressModel>(
            r#"
            INSERT INTO reading_progress
                (user_id, group_id, book_id, current_page, total_pages, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, group_id, book_id) DO UPDATE
            SET current_page = EXCLUDED.current_page,
                total_pages = EXCLUDED.total_pages,
                updated_at = EXCLUDED.updated_at
            WHERE reading_progress.updated_at <= EXCLUDED.updated_at
            RETURNING user_id, group_id, book_id, current_page, total_pages, updated_at
            "#,
        )
        .bind(insert.user_id)
        .bind(insert.group_id)
        .bind(insert.book_id)
        .bind(insert.current_page)
        .bind(insert.total_pages)
        .bind(progress.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match written {
            Some(model) => ReadingProgress::try_from(model),
            None => self
                .find(progress.user_id, progress.group_id, progress.book_id)
                .await?
                .ok_or(DomainError::ProgressNotFound),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        group_id: Option<Snowflake>,
    ) -> RepoResult<Vec<ReadingProgress>> {
        let results = sqlx::query_as::<_, ProgressModel>(
            r#"
            SELECT user_id, group_id, book_id, current_page, total_pages, updated_at
            FROM reading_progress
            WHERE user_id = $1 AND ($2::BIGINT IS NULL OR group_id = $2)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id.into_inner())
        .bind(group_id.map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ReadingProgress::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_book(
        &self,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Vec<ReadingProgress>> {
        let results = sqlx::query_as::<_, ProgressModel>(
            r#"
            SELECT user_id, group_id, book_id, current_page, total_pages, updated_at
            FROM reading_progress
            WHERE group_id = $1 AND book_id = $2
            "#,
        )
        .bind(group_id.into_inner())
        .bind(book_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ReadingProgress::try_from).collect()
    }
}
