//! Comment entity <-> model mapper

use readalong_core::entities::Comment;
use readalong_core::error::DomainError;
use readalong_core::value_objects::{PageProgress, Snowflake};

use crate::models::CommentModel;

impl TryFrom<CommentModel> for Comment {
    type Error = DomainError;

    fn try_from(model: CommentModel) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: Snowflake::new(model.id),
            group_id: Snowflake::new(model.group_id),
            book_id: Snowflake::new(model.book_id),
            user_id: Snowflake::new(model.user_id),
            content: model.content,
            progress: PageProgress::new(model.progress_page, model.progress_total_pages)?,
            parent_comment_id: model.parent_comment_id.map(Snowflake::new),
            created_at: model.created_at,
            like_count: model.like_count,
            report_count: model.report_count,
        })
    }
}

/// Convert Comment entity reference to values for database insertion
pub struct CommentInsert<'a> {
    pub id: i64,
    pub group_id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub content: &'a str,
    pub progress_page: i32,
    pub progress_total_pages: i32,
    pub parent_comment_id: Option<i64>,
}

impl<'a> CommentInsert<'a> {
    pub fn new(comment: &'a Comment) -> Self {
        Self {
            id: comment.id.into_inner(),
            group_id: comment.group_id.into_inner(),
            book_id: comment.book_id.into_inner(),
            user_id: comment.user_id.into_inner(),
            content: &comment.content,
            progress_page: comment.progress.current_page(),
            progress_total_pages: comment.progress.total_pages(),
            parent_comment_id: comment.parent_comment_id.map(Snowflake::into_inner),
        }
    }
}
