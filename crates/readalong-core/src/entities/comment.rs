//! Comment entity - a discussion post pinned to the author's position in the book

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{PageProgress, Snowflake};

/// Default maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Comment entity
///
/// Content is immutable once posted. `like_count` and `report_count` are read from the
/// like and report ledgers when the comment is loaded and are never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub group_id: Snowflake,
    pub book_id: Snowflake,
    pub user_id: Snowflake,
    pub content: String,
    /// Author's position at the time of posting
    pub progress: PageProgress,
    pub parent_comment_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub report_count: i64,
}

impl Comment {
    /// Create a new top-level comment or reply
    pub fn new(
        id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
        user_id: Snowflake,
        content: String,
        progress: PageProgress,
        parent_comment_id: Option<Snowflake>,
    ) -> Self {
        Self {
            id,
            group_id,
            book_id,
            user_id,
            content,
            progress,
            parent_comment_id,
            created_at: Utc::now(),
            like_count: 0,
            report_count: 0,
        }
    }

    /// Check content against the posting rules.
    ///
    /// Whitespace-only content counts as empty; length is measured in characters.
    pub fn validate_content(content: &str, max_chars: usize) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }
        if content.chars().count() > max_chars {
            return Err(DomainError::ContentTooLong { max: max_chars });
        }
        Ok(())
    }

    #[inline]
    pub fn progress_page(&self) -> i32 {
        self.progress.current_page()
    }

    #[inline]
    pub fn progress_percentage(&self) -> f64 {
        self.progress.percentage()
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }

    /// Check whether the comment lives in the given group's discussion of a book
    #[inline]
    pub fn belongs_to(&self, group_id: Snowflake, book_id: Snowflake) -> bool {
        self.group_id == group_id && self.book_id == book_id
    }

    /// Ordering key within a thread level: oldest first, id breaks ties
    #[inline]
    pub fn thread_order_key(&self) -> (DateTime<Utc>, Snowflake) {
        (self.created_at, self.id)
    }
}
