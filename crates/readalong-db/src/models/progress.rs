//! Reading progress database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reading_progress table
#[derive(Debug, Clone, FromRow)]
pub struct ProgressModel {
    pub user_id: i64,
    pub group_id: i64,
    pub book_id: i64,
    pub current_page: i32,
    pub total_pages: i32,
    pub updated_at: DateTime<Utc>,
}
