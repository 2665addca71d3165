//! Reading progress entity <-> model mapper

use readalong_core::entities::ReadingProgress;
use readalong_core::error::DomainError;
use readalong_core::value_objects::{PageProgress, Snowflake};

use crate::models::ProgressModel;

impl TryFrom<ProgressModel> for ReadingProgress {
    type Error = DomainError;

    fn try_from(model: ProgressModel) -> Result<Self, Self::Error> {
        Ok(ReadingProgress {
            user_id: Snowflake::new(model.user_id),
            group_id: Snowflake::new(model.group_id),
            book_id: Snowflake::new(model.book_id),
            position: PageProgress::new(model.current_page, model.total_pages)?,
            updated_at: model.updated_at,
        })
    }
}

/// Values bound by the progress upsert
pub struct ProgressInsert {
    pub user_id: i64,
    pub group_id: i64,
    pub book_id: i64,
    pub current_page: i32,
    pub total_pages: i32,
}

impl ProgressInsert {
    pub fn new(progress: &ReadingProgress) -> Self {
        Self {
            user_id: progress.user_id.into_inner(),
            group_id: progress.group_id.into_inner(),
            book_id: progress.book_id.into_inner(),
            current_page: progress.current_page(),
            total_pages: progress.total_pages(),
        }
    }
}
