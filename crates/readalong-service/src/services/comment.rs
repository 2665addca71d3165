//! Comment service
//!
//! Posting and reading a book's discussion. Every read is gated by the viewer's current
//! position, loaded fresh for each call; nothing derived from it is cached.

use std::collections::HashMap;

use readalong_core::entities::{Comment, GroupMember, ReadingProgress};
use readalong_core::visibility::{build_thread, partition, summarize_ahead, Partition, Viewer};
use readalong_core::{DomainError, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::{
    display_name, thread_responses, AheadSummaryResponse, CommentResponse, CommentThreadResponse,
    CommentView, DiscussionResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::membership::MembershipService;
use super::progress::ProgressService;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a comment or reply pinned to the author's current position
    ///
    /// # Errors
    /// - `EmptyContent` / `ContentTooLong` for invalid content
    /// - `ProgressRequired` when the author has not set progress for the book
    /// - `ParentCommentNotFound` when the parent is missing, belongs to another book, or is
    ///   ahead of the author
    #[instrument(skip(self, content))]
    pub async fn post_comment(
        &self,
        author_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
        content: String,
        parent_comment_id: Option<Snowflake>,
    ) -> ServiceResult<CommentResponse> {
        let author = MembershipService::new(self.ctx)
            .require_member(group_id, author_id)
            .await?;

        Comment::validate_content(&content, self.ctx.discussion().max_comment_length)?;

        let progress = ProgressService::new(self.ctx)
            .current(author_id, group_id, book_id)
            .await?
            .ok_or(DomainError::ProgressRequired)?;

        if let Some(parent_id) = parent_comment_id {
            let viewer = Viewer::new(author_id, Some(progress.position));
            let parent = self.ctx.comment_repo().find_by_id(parent_id).await?;
            let reachable = parent
                .as_ref()
                .is_some_and(|p| p.belongs_to(group_id, book_id) && viewer.can_see(p));
            if !reachable {
                return Err(DomainError::ParentCommentNotFound(parent_id).into());
            }
        }

        let comment = Comment::new(
            self.ctx.generate_id(),
            group_id,
            book_id,
            author_id,
            content,
            progress.position,
            parent_comment_id,
        );
        self.ctx.comment_repo().create(&comment).await?;

        info!(
            comment_id = %comment.id,
            group_id = %group_id,
            book_id = %book_id,
            author_id = %author_id,
            progress_page = comment.progress_page(),
            "Comment posted"
        );

        Ok(CommentView {
            comment: &comment,
            author: Some(&author),
            viewer_id: author_id,
            liked_by_me: false,
        }
        .into())
    }

    /// The reply forest of comments the viewer may read
    #[instrument(skip(self))]
    pub async fn visible_thread(
        &self,
        viewer_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> ServiceResult<Vec<CommentThreadResponse>> {
        let (viewer, _, comments) = self.load_book(viewer_id, group_id, book_id).await?;
        let Partition { visible, .. } = partition(&viewer, comments);
        if visible.is_empty() {
            return Ok(Vec::new());
        }
        let members = MembershipService::new(self.ctx).members_by_id(group_id).await?;
        self.render_thread(viewer_id, visible, &members).await
    }

    /// Content-free summary of the comments ahead of the viewer
    #[instrument(skip(self))]
    pub async fn ahead_summary(
        &self,
        viewer_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> ServiceResult<AheadSummaryResponse> {
        let (viewer, _, comments) = self.load_book(viewer_id, group_id, book_id).await?;
        let Partition { ahead, .. } = partition(&viewer, comments);
        if ahead.is_empty() {
            return Ok(AheadSummaryResponse::default());
        }
        let members = MembershipService::new(self.ctx).members_by_id(group_id).await?;
        Ok(summarize_ahead(&viewer, ahead, |id| display_name(members.get(&id))).into())
    }

    /// Progress, visible thread and ahead summary in one response for polling clients
    #[instrument(skip(self))]
    pub async fn discussion(
        &self,
        viewer_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> ServiceResult<DiscussionResponse> {
        let (viewer, progress, comments) = self.load_book(viewer_id, group_id, book_id).await?;
        let Partition { visible, ahead } = partition(&viewer, comments);
        let members = MembershipService::new(self.ctx).members_by_id(group_id).await?;

        let comments = self.render_thread(viewer_id, visible, &members).await?;
        let ahead = summarize_ahead(&viewer, ahead, |id| display_name(members.get(&id)));

        debug!(
            visible = comments.len(),
            ahead = ahead.count,
            "Discussion assembled"
        );

        Ok(DiscussionResponse {
            progress: progress.map(Into::into),
            comments,
            ahead: ahead.into(),
            poll_interval_seconds: self.ctx.discussion().poll_interval_seconds,
        })
    }

    /// A single comment, if the viewer may read it
    ///
    /// # Errors
    /// - `CommentNotFound` when missing or outside the viewer's groups
    /// - `CommentAhead` when the viewer has not reached it yet
    #[instrument(skip(self))]
    pub async fn get_comment(
        &self,
        viewer_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<CommentResponse> {
        let comment = self.require_visible(viewer_id, comment_id).await?;
        let author = self
            .ctx
            .membership_repo()
            .find_member(comment.group_id, comment.user_id)
            .await?;
        let liked = self
            .ctx
            .like_repo()
            .liked_comment_ids(viewer_id, &[comment.id])
            .await?;

        Ok(CommentView {
            comment: &comment,
            author: author.as_ref(),
            viewer_id,
            liked_by_me: liked.contains(&comment.id),
        }
        .into())
    }

    /// Load a comment and check that `user_id` may act on it.
    ///
    /// Comments in groups the user does not belong to are reported as missing.
    pub(crate) async fn require_visible(
        &self,
        user_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<Comment> {
        let not_found = || DomainError::CommentNotFound(comment_id);

        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(not_found)?;

        if !MembershipService::new(self.ctx)
            .is_member(comment.group_id, user_id)
            .await?
        {
            return Err(not_found().into());
        }

        let progress = ProgressService::new(self.ctx)
            .current(user_id, comment.group_id, comment.book_id)
            .await?;
        if !Viewer::from_record(user_id, progress.as_ref()).can_see(&comment) {
            return Err(DomainError::CommentAhead.into());
        }

        Ok(comment)
    }

    /// Membership check, viewer position, and the book's comments.
    ///
    /// Comments are not loaded for a viewer without progress, who sees nothing.
    async fn load_book(
        &self,
        viewer_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> ServiceResult<(Viewer, Option<ReadingProgress>, Vec<Comment>)> {
        MembershipService::new(self.ctx)
            .require_member(group_id, viewer_id)
            .await?;

        let progress = ProgressService::new(self.ctx)
            .current(viewer_id, group_id, book_id)
            .await?;
        let viewer = Viewer::from_record(viewer_id, progress.as_ref());

        let comments = if viewer.has_progress() {
            self.ctx.comment_repo().find_by_book(group_id, book_id).await?
        } else {
            Vec::new()
        };

        Ok((viewer, progress, comments))
    }

    async fn render_thread(
        &self,
        viewer_id: Snowflake,
        visible: Vec<Comment>,
        members: &HashMap<Snowflake, GroupMember>,
    ) -> ServiceResult<Vec<CommentThreadResponse>> {
        let ids: Vec<Snowflake> = visible.iter().map(|c| c.id).collect();
        let liked = self.ctx.like_repo().liked_comment_ids(viewer_id, &ids).await?;

        Ok(thread_responses(build_thread(visible), |c| {
            CommentView {
                comment: c,
                author: members.get(&c.user_id),
                viewer_id,
                liked_by_me: liked.contains(&c.id),
            }
            .into()
        }))
    }
}
