//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{comments, health, likes, progress, reports};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(progress_routes())
        .merge(discussion_routes())
        .merge(comment_routes())
}

/// Reading progress routes
fn progress_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/progress",
            post(progress::set_progress).get(progress::list_my_progress),
        )
        .route(
            "/groups/:group_id/books/:book_id/progress",
            get(progress::get_progress),
        )
        .route(
            "/groups/:group_id/books/:book_id/progress/all",
            get(progress::get_book_progress),
        )
}

/// Per-book discussion routes
fn discussion_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups/:group_id/books/:book_id/comments",
            get(comments::get_comments).post(comments::create_comment),
        )
        .route(
            "/groups/:group_id/books/:book_id/comments/ahead",
            get(comments::get_ahead),
        )
        .route(
            "/groups/:group_id/books/:book_id/discussion",
            get(comments::get_discussion),
        )
}

/// Single comment routes
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments/:comment_id", get(comments::get_comment))
        .route(
            "/comments/:comment_id/like",
            post(likes::toggle_like)
                .put(likes::like_comment)
                .delete(likes::unlike_comment),
        )
        .route("/comments/:comment_id/report", post(reports::report_comment))
}
