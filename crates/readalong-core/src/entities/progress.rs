//! Reading progress entity - where a reader is in a book within a group

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PageProgress, Snowflake};

/// One live record per (user, group, book); later submissions replace it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub user_id: Snowflake,
    pub group_id: Snowflake,
    pub book_id: Snowflake,
    pub position: PageProgress,
    pub updated_at: DateTime<Utc>,
}

impl ReadingProgress {
    /// Create a progress record stamped with the current time
    pub fn new(
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
        position: PageProgress,
    ) -> Self {
        Self {
            user_id,
            group_id,
            book_id,
            position,
            updated_at: Utc::now(),
        }
    }

    #[inline]
    pub fn current_page(&self) -> i32 {
        self.position.current_page()
    }

    #[inline]
    pub fn total_pages(&self) -> i32 {
        self.position.total_pages()
    }

    #[inline]
    pub fn progress_percentage(&self) -> f64 {
        self.position.percentage()
    }

    /// Last-write-wins check used when two writes for the same key race
    #[inline]
    pub fn supersedes(&self, other: &Self) -> bool {
        self.updated_at >= other.updated_at
    }
}
