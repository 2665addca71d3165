//! Group member entity - a reader's membership in a reading group
//!
//! Memberships are owned by the group service; this crate only reads them to gate
//! access and to resolve author display names.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Group member entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub group_id: Snowflake,
    pub user_id: Snowflake,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    /// Create a new GroupMember
    pub fn new(group_id: Snowflake, user_id: Snowflake, display_name: impl Into<String>) -> Self {
        Self {
            group_id,
            user_id,
            display_name: display_name.into(),
            avatar_url: None,
            joined_at: Utc::now(),
        }
    }

    /// Attach an avatar
    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_creation() {
        let member = GroupMember::new(Snowflake::new(100), Snowflake::new(200), "Ada");
        assert_eq!(member.group_id, Snowflake::new(100));
        assert_eq!(member.display_name, "Ada");
        assert!(member.avatar_url.is_none());

        let member = member.with_avatar("https://img.example/ada.png");
        assert_eq!(member.avatar_url.as_deref(), Some("https://img.example/ada.png"));
    }
}
