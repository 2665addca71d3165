//! Progress service
//!
//! Stores each reader's position per (group, book). The store is the source of truth; the
//! cache, when configured, is written through on every update and read first on lookups.

use std::cmp::Ordering;

use readalong_core::entities::ReadingProgress;
use readalong_core::{PageProgress, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{MemberProgress, MemberProgressResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::membership::MembershipService;

/// Progress service
pub struct ProgressService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProgressService<'a> {
    /// Create a new ProgressService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set or update the caller's position in a book
    ///
    /// # Errors
    /// `InvalidProgress` when the page is negative, past the end, or the book has no pages.
    #[instrument(skip(self))]
    pub async fn set_progress(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
        current_page: i32,
        total_pages: i32,
    ) -> ServiceResult<ReadingProgress> {
        MembershipService::new(self.ctx)
            .require_member(group_id, user_id)
            .await?;

        let position = PageProgress::new(current_page, total_pages)?;
        let record = ReadingProgress::new(user_id, group_id, book_id, position);
        let stored = self.ctx.progress_repo().upsert(&record).await?;

        if let Some(cache) = self.ctx.progress_cache() {
            if let Err(e) = cache.put(&stored).await {
                warn!(error = %e, user_id = %user_id, "Failed to cache progress, invalidating");
                // Never leave an older position cached, nor let a racing backfill restore one
                if let Err(e) = cache.invalidate(&stored).await {
                    warn!(error = %e, user_id = %user_id, "Failed to invalidate cached progress");
                }
            }
        }

        info!(
            user_id = %user_id,
            group_id = %group_id,
            book_id = %book_id,
            current_page,
            total_pages,
            "Reading progress updated"
        );

        Ok(stored)
    }

    /// Get the caller's position in a book, `None` if never set
    #[instrument(skip(self))]
    pub async fn get_progress(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> ServiceResult<Option<ReadingProgress>> {
        MembershipService::new(self.ctx)
            .require_member(group_id, user_id)
            .await?;
        self.current(user_id, group_id, book_id).await
    }

    /// Current stored position without a membership check.
    ///
    /// Reads the cache first and falls back to the store on a miss or a cache failure,
    /// backfilling the cache from the store.
    pub(crate) async fn current(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> ServiceResult<Option<ReadingProgress>> {
        let cache = self.ctx.progress_cache();

        if let Some(cache) = cache {
            match cache.get(user_id, group_id, book_id).await {
                Ok(Some(hit)) => return Ok(Some(hit)),
                Ok(None) => {}
                Err(e) => warn!(error = %e, user_id = %user_id, "Progress cache read failed"),
            }
        }

        let stored = self
            .ctx
            .progress_repo()
            .find(user_id, group_id, book_id)
            .await?;

        if let (Some(cache), Some(record)) = (cache, stored.as_ref()) {
            if let Err(e) = cache.put(record).await {
                warn!(error = %e, user_id = %user_id, "Failed to backfill progress cache");
            }
        }

        Ok(stored)
    }

    /// List the caller's progress records, optionally limited to one group
    #[instrument(skip(self))]
    pub async fn list_my_progress(
        &self,
        user_id: Snowflake,
        group_id: Option<Snowflake>,
    ) -> ServiceResult<Vec<ReadingProgress>> {
        if let Some(group_id) = group_id {
            MembershipService::new(self.ctx)
                .require_member(group_id, user_id)
                .await?;
        }
        let mut records = self.ctx.progress_repo().find_by_user(user_id, group_id).await?;
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    /// Every member's position in a book, furthest along first
    #[instrument(skip(self))]
    pub async fn group_book_progress(
        &self,
        viewer_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> ServiceResult<Vec<MemberProgressResponse>> {
        let membership = MembershipService::new(self.ctx);
        membership.require_member(group_id, viewer_id).await?;

        let mut records = self.ctx.progress_repo().find_by_book(group_id, book_id).await?;
        records.sort_by(furthest_first);

        let members = membership.members_by_id(group_id).await?;
        Ok(records
            .iter()
            .map(|progress| {
                MemberProgress {
                    progress,
                    member: members.get(&progress.user_id),
                }
                .into()
            })
            .collect())
    }
}

fn furthest_first(a: &ReadingProgress, b: &ReadingProgress) -> Ordering {
    b.position
        .cmp_position(&a.position)
        .then_with(|| a.user_id.cmp(&b.user_id))
}
