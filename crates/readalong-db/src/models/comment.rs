//! Comment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for comments table, with ledger counts joined in
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub group_id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub content: String,
    pub progress_page: i32,
    pub progress_total_pages: i32,
    pub parent_comment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub report_count: i64,
}
