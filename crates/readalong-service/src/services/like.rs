//! Like service
//!
//! A like is one reader's membership in a comment's liked-by set. Each change is a single
//! conditional write in the like repository, so concurrent requests cannot double count.

use readalong_core::entities::LikeAction;
use readalong_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::LikeResponse;

use super::comment::CommentService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Like service
pub struct LikeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LikeService<'a> {
    /// Create a new LikeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Flip the caller's like on a comment
    #[instrument(skip(self))]
    pub async fn toggle_like(
        &self,
        user_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<LikeResponse> {
        self.apply(user_id, comment_id, LikeAction::Toggle).await
    }

    /// Like or unlike a comment. Repeating the current state is a no-op.
    #[instrument(skip(self))]
    pub async fn set_like(
        &self,
        user_id: Snowflake,
        comment_id: Snowflake,
        liked: bool,
    ) -> ServiceResult<LikeResponse> {
        self.apply(user_id, comment_id, LikeAction::Set(liked)).await
    }

    async fn apply(
        &self,
        user_id: Snowflake,
        comment_id: Snowflake,
        action: LikeAction,
    ) -> ServiceResult<LikeResponse> {
        CommentService::new(self.ctx)
            .require_visible(user_id, comment_id)
            .await?;

        let state = self.ctx.like_repo().apply(comment_id, user_id, action).await?;

        info!(
            comment_id = %comment_id,
            user_id = %user_id,
            liked = state.liked,
            like_count = state.like_count,
            "Like updated"
        );

        Ok(LikeResponse::new(comment_id, state))
    }
}
