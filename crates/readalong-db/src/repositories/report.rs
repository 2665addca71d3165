//! PostgreSQL implementation of ReportRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use readalong_core::entities::SpoilerReport;
use readalong_core::error::DomainError;
use readalong_core::traits::{ReportRepository, RepoResult};
use readalong_core::value_objects::Snowflake;

use crate::mappers::ReportInsert;
use crate::models::ReportModel;

use super::error::{comment_not_found, map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of ReportRepository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_pending(
        &self,
        comment_id: Snowflake,
        reported_by: Snowflake,
    ) -> RepoResult<Option<SpoilerReport>> {
        let result = sqlx::query_as::<_, ReportModel>(
            r#"
            SELECT id, comment_id, reported_by, reason, status, created_at
            FROM spoiler_reports
            WHERE comment_id = $1 AND reported_by = $2 AND status = 'pending'
            "#,
        )
        .bind(comment_id.into_inner())
        .bind(reported_by.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(SpoilerReport::try_from).transpose()
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self, report), fields(comment_id = %report.comment_id))]
    async fn create(&self, report: &SpoilerReport) -> RepoResult<SpoilerReport> {
        let insert = ReportInsert::new(report);

        let created = sqlx::query_as::<_, ReportModel>(
            r#"
            INSERT INTO spoiler_reports (id, comment_id, reported_by, reason, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (comment_id, reported_by) WHERE status = 'pending' DO NOTHING
            RETURNING id, comment_id, reported_by, reason, status, created_at
            "#,
        )
        .bind(insert.id)
        .bind(insert.comment_id)
        .bind(insert.reported_by)
        .bind(insert.reason)
        .bind(insert.status)
        .bind(report.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || comment_not_found(report.comment_id)))?;

        match created {
            Some(model) => SpoilerReport::try_from(model),
            None => self
                .find_pending(report.comment_id, report.reported_by)
                .await?
                .ok_or_else(|| {
                    DomainError::DatabaseError("pending report vanished during insert".to_string())
                }),
        }
    }
}
