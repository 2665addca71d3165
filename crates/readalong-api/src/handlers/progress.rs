//! Reading progress handlers

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use readalong_core::DomainError;
use readalong_service::dto::{
    MemberProgressResponse, ProgressQuery, ProgressResponse, SetProgressRequest,
};
use readalong_service::ProgressService;

use crate::extractors::{AuthUser, GroupBookPath, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Set or update the caller's position
///
/// POST /progress
pub async fn set_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SetProgressRequest>,
) -> ApiResult<Created<ProgressResponse>> {
    let service = ProgressService::new(state.service_context());
    let progress = service
        .set_progress(
            auth.user_id,
            req.group_id,
            req.book_id,
            req.current_page,
            req.total_pages,
        )
        .await?;
    Ok(Created(progress.into()))
}

/// List the caller's progress, optionally for one group
///
/// GET /progress?group_id=
pub async fn list_my_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ProgressQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProgressResponse>>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;

    let service = ProgressService::new(state.service_context());
    let records = service.list_my_progress(auth.user_id, query.group_id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Get the caller's position in a book
///
/// GET /groups/{group_id}/books/{book_id}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GroupBookPath>,
) -> ApiResult<Json<ProgressResponse>> {
    let (group_id, book_id) = path.ids()?;

    let service = ProgressService::new(state.service_context());
    let progress = service
        .get_progress(auth.user_id, group_id, book_id)
        .await?
        .ok_or(DomainError::ProgressNotFound)?;
    Ok(Json(progress.into()))
}

/// Every member's position in a book, furthest along first
///
/// GET /groups/{group_id}/books/{book_id}/progress/all
pub async fn get_book_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GroupBookPath>,
) -> ApiResult<Json<Vec<MemberProgressResponse>>> {
    let (group_id, book_id) = path.ids()?;

    let service = ProgressService::new(state.service_context());
    let listing = service
        .group_book_progress(auth.user_id, group_id, book_id)
        .await?;
    Ok(Json(listing))
}
