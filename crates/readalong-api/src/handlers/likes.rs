//! Like handlers
//!
//! `POST` toggles; `PUT` and `DELETE` set the state explicitly and are idempotent.

use axum::{
    extract::{Path, State},
    Json,
};
use readalong_service::dto::LikeResponse;
use readalong_service::LikeService;

use crate::extractors::{AuthUser, CommentIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Toggle the caller's like
///
/// POST /comments/{comment_id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<LikeResponse>> {
    let comment_id = path.comment_id()?;

    let service = LikeService::new(state.service_context());
    Ok(Json(service.toggle_like(auth.user_id, comment_id).await?))
}

/// Like a comment
///
/// PUT /comments/{comment_id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<LikeResponse>> {
    let comment_id = path.comment_id()?;

    let service = LikeService::new(state.service_context());
    Ok(Json(service.set_like(auth.user_id, comment_id, true).await?))
}

/// Remove the caller's like
///
/// DELETE /comments/{comment_id}/like
pub async fn unlike_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<LikeResponse>> {
    let comment_id = path.comment_id()?;

    let service = LikeService::new(state.service_context());
    Ok(Json(service.set_like(auth.user_id, comment_id, false).await?))
}
