//! Comment handlers
//!
//! Every read is filtered by the caller's current reading position.

use axum::{
    extract::{Path, State},
    Json,
};
use readalong_service::dto::{
    AheadSummaryResponse, CommentResponse, CommentThreadResponse, CreateCommentRequest,
    DiscussionResponse,
};
use readalong_service::CommentService;

use crate::extractors::{AuthUser, CommentIdPath, GroupBookPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Post a comment or reply at the caller's current position
///
/// POST /groups/{group_id}/books/{book_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GroupBookPath>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<CommentResponse>> {
    let (group_id, book_id) = path.ids()?;

    let service = CommentService::new(state.service_context());
    let comment = service
        .post_comment(
            auth.user_id,
            group_id,
            book_id,
            req.content,
            req.parent_comment_id,
        )
        .await?;
    Ok(Created(comment))
}

/// Visible comment tree
///
/// GET /groups/{group_id}/books/{book_id}/comments
pub async fn get_comments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GroupBookPath>,
) -> ApiResult<Json<Vec<CommentThreadResponse>>> {
    let (group_id, book_id) = path.ids()?;

    let service = CommentService::new(state.service_context());
    let thread = service.visible_thread(auth.user_id, group_id, book_id).await?;
    Ok(Json(thread))
}

/// Summary of comments ahead of the caller
///
/// GET /groups/{group_id}/books/{book_id}/comments/ahead
pub async fn get_ahead(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GroupBookPath>,
) -> ApiResult<Json<AheadSummaryResponse>> {
    let (group_id, book_id) = path.ids()?;

    let service = CommentService::new(state.service_context());
    let summary = service.ahead_summary(auth.user_id, group_id, book_id).await?;
    Ok(Json(summary))
}

/// Progress, visible tree and ahead summary for polling clients
///
/// GET /groups/{group_id}/books/{book_id}/discussion
pub async fn get_discussion(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GroupBookPath>,
) -> ApiResult<Json<DiscussionResponse>> {
    let (group_id, book_id) = path.ids()?;

    let service = CommentService::new(state.service_context());
    let view = service.discussion(auth.user_id, group_id, book_id).await?;
    Ok(Json(view))
}

/// Get a single comment
///
/// GET /comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<CommentResponse>> {
    let comment_id = path.comment_id()?;

    let service = CommentService::new(state.service_context());
    let comment = service.get_comment(auth.user_id, comment_id).await?;
    Ok(Json(comment))
}
