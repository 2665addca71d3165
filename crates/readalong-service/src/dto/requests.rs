//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation. Length
//! limits that are configurable are enforced by the services, not here.

use readalong_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Progress Requests
// ============================================================================

/// Set or update the caller's position in a book
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetProgressRequest {
    pub group_id: Snowflake,
    pub book_id: Snowflake,

    #[validate(range(min = 0, message = "current_page must not be negative"))]
    pub current_page: i32,

    #[validate(range(min = 1, message = "total_pages must be at least 1"))]
    pub total_pages: i32,
}

/// Query for listing the caller's progress
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressQuery {
    pub group_id: Option<Snowflake>,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Post a comment or reply
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Reply target, must be visible to the author
    #[serde(default)]
    pub parent_comment_id: Option<Snowflake>,
}

/// Flag a comment as a spoiler
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportCommentRequest {
    #[validate(length(min = 1, message = "Reason must not be empty"))]
    pub reason: String,
}
