//! Group member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for group_members table
#[derive(Debug, Clone, FromRow)]
pub struct GroupMemberModel {
    pub group_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub joined_at: DateTime<Utc>,
}
