//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs and the infrastructure layer provides the
//! implementation (PostgreSQL in production, an in-memory store for tests and local runs).

use std::collections::HashSet;

use async_trait::async_trait;

use crate::entities::{
    Comment, GroupMember, LikeAction, LikeState, ReadingProgress, SpoilerReport,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Progress Repository
// ============================================================================

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Find a reader's progress on one book in one group
    async fn find(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Option<ReadingProgress>>;

    /// Insert or replace the record for (user, group, book).
    ///
    /// Last write wins by `updated_at`: a write older than the stored record is ignored and
    /// the stored record is returned instead.
    async fn upsert(&self, progress: &ReadingProgress) -> RepoResult<ReadingProgress>;

    /// List a reader's progress records, optionally limited to one group
    async fn find_by_user(
        &self,
        user_id: Snowflake,
        group_id: Option<Snowflake>,
    ) -> RepoResult<Vec<ReadingProgress>>;

    /// List every member's progress on a book
    async fn find_by_book(
        &self,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Vec<ReadingProgress>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// Loaded comments carry `like_count` and `report_count` computed from the ledgers.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// List all comments of a group's discussion of a book, oldest first
    async fn find_by_book(&self, group_id: Snowflake, book_id: Snowflake)
        -> RepoResult<Vec<Comment>>;

    /// Create a new comment
    async fn create(&self, comment: &Comment) -> RepoResult<()>;
}

// ============================================================================
// Like Repository
// ============================================================================

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Apply a like action as one atomic conditional write and return the resulting
    /// membership with the like count recomputed from the ledger.
    async fn apply(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        action: LikeAction,
    ) -> RepoResult<LikeState>;

    /// Subset of `comment_ids` the user has liked
    async fn liked_comment_ids(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashSet<Snowflake>>;
}

// ============================================================================
// Report Repository
// ============================================================================

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Record a report.
    ///
    /// If the reporter already has a pending report on the comment, that report is
    /// returned unchanged.
    async fn create(&self, report: &SpoilerReport) -> RepoResult<SpoilerReport>;
}

// ============================================================================
// Membership Repository
// ============================================================================

/// Read-only view of the group membership collaborator
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a member by group and user ID
    async fn find_member(
        &self,
        group_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GroupMember>>;

    /// List all members of a group
    async fn find_members(&self, group_id: Snowflake) -> RepoResult<Vec<GroupMember>>;
}
