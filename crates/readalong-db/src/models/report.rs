//! Spoiler report database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for spoiler_reports table
#[derive(Debug, Clone, FromRow)]
pub struct ReportModel {
    pub id: i64,
    pub comment_id: i64,
    pub reported_by: i64,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
