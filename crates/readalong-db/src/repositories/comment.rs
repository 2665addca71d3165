//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use readalong_core::entities::Comment;
use readalong_core::error::DomainError;
use readalong_core::traits::{CommentRepository, RepoResult};
use readalong_core::value_objects::Snowflake;

use crate::mappers::CommentInsert;
use crate::models::CommentModel;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT c.id, c.group_id, c.book_id, c.user_id, c.content,
                   c.progress_page, c.progress_total_pages, c.parent_comment_id, c.created_at,
                   (SELECT COUNT(*) FROM comment_likes l WHERE l.comment_id = c.id) AS like_count,
                   (SELECT COUNT(*) FROM spoiler_reports r WHERE r.comment_id = c.id) AS report_count
            FROM comments c
            WHERE c.id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Comment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_book(
        &self,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT c.id, c.group_id, c.book_id, c.user_id, c.content,
                   c.progress_page, c.progress_total_pages, c.parent_comment_id, c.created_at,
                   COALESCE(l.like_count, 0) AS like_count,
                   COALESCE(r.report_count, 0) AS report_count
            FROM comments c
            LEFT JOIN (
                SELECT comment_id, COUNT(*) AS like_count
                FROM comment_likes GROUP BY comment_id
            ) l ON l.comment_id = c.id
            LEFT JOIN (
                SELECT comment_id, COUNT(*) AS report_count
                FROM spoiler_reports GROUP BY comment_id
            ) r ON r.comment_id = c.id
            WHERE c.group_id = $1 AND c.book_id = $2
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(group_id.into_inner())
        .bind(book_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Comment::try_from).collect()
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let insert = CommentInsert::new(comment);

        sqlx::query(
            r#"
            INSERT INTO comments
                (id, group_id, book_id, user_id, content, progress_page,
                 progress_total_pages, parent_comment_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(insert.id)
        .bind(insert.group_id)
        .bind(insert.book_id)
        .bind(insert.user_id)
        .bind(insert.content)
        .bind(insert.progress_page)
        .bind(insert.progress_total_pages)
        .bind(insert.parent_comment_id)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(e, || {
                DomainError::ParentCommentNotFound(
                    comment.parent_comment_id.unwrap_or(comment.id),
                )
            })
        })?;

        Ok(())
    }
}
