//! Report service - spoiler flags raised by readers

use readalong_core::entities::SpoilerReport;
use readalong_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::ReportResponse;

use super::comment::CommentService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Report service
pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReportService<'a> {
    /// Create a new ReportService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Report a comment as a spoiler.
    ///
    /// Reporting again while an earlier report by the same reader is pending returns that
    /// report. Reports never change visibility.
    ///
    /// # Errors
    /// - `EmptyReportReason` / `ReportReasonTooLong` for an invalid reason
    /// - `CannotReportOwnComment` when the reporter wrote the comment
    /// - `CommentAhead` / `CommentNotFound` as for reading the comment
    #[instrument(skip(self, reason))]
    pub async fn report_comment(
        &self,
        reporter_id: Snowflake,
        comment_id: Snowflake,
        reason: String,
    ) -> ServiceResult<ReportResponse> {
        SpoilerReport::validate_reason(&reason, self.ctx.discussion().max_report_reason_length)?;

        let comment = CommentService::new(self.ctx)
            .require_visible(reporter_id, comment_id)
            .await?;
        if comment.is_authored_by(reporter_id) {
            return Err(DomainError::CannotReportOwnComment.into());
        }

        let report = SpoilerReport::new(self.ctx.generate_id(), comment_id, reporter_id, reason);
        let stored = self.ctx.report_repo().create(&report).await?;

        if stored.id == report.id {
            info!(
                report_id = %stored.id,
                comment_id = %comment_id,
                reporter_id = %reporter_id,
                "Spoiler report filed"
            );
        }

        Ok(stored.into())
    }
}
