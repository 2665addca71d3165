//! Spoiler report handlers

use axum::extract::{Path, State};
use readalong_service::dto::{ReportCommentRequest, ReportResponse};
use readalong_service::ReportService;

use crate::extractors::{AuthUser, CommentIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Report a comment as a spoiler
///
/// POST /comments/{comment_id}/report
pub async fn report_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(req): ValidatedJson<ReportCommentRequest>,
) -> ApiResult<Created<ReportResponse>> {
    let comment_id = path.comment_id()?;

    let service = ReportService::new(state.service_context());
    let report = service
        .report_comment(auth.user_id, comment_id, req.reason)
        .await?;
    Ok(Created(report))
}
