use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use readalong_core::entities::{
    Comment, GroupMember, LikeAction, LikeState, ReadingProgress, SpoilerReport,
};
use readalong_core::error::DomainError;
use readalong_core::traits::{
    CommentRepository, LikeRepository, MembershipRepository, ProgressRepository, RepoResult,
    ReportRepository,
};
use readalong_core::value_objects::Snowflake;

type ProgressKey = (Snowflake, Snowflake, Snowflake);

/// Thread-safe store holding all discussion state in process memory
#[derive(Default)]
pub struct MemoryStore {
    /// (user, group, book) -> live record
    progress: DashMap<ProgressKey, ReadingProgress>,
    /// Stored without counts; counts are derived on read
    comments: DashMap<Snowflake, Comment>,
    /// comment -> users who like it
    likes: DashMap<Snowflake, HashSet<Snowflake>>,
    reports: Mutex<Vec<SpoilerReport>>,
    /// (group, user) -> member
    members: DashMap<(Snowflake, Snowflake), GroupMember>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Seed a group membership, standing in for the group service
    pub fn add_member(&self, member: GroupMember) {
        debug!(group_id = %member.group_id, user_id = %member.user_id, "Member seeded");
        self.members.insert((member.group_id, member.user_id), member);
    }

    fn like_count(&self, comment_id: Snowflake) -> i64 {
        self.likes
            .get(&comment_id)
            .map_or(0, |users| users.len() as i64)
    }

    fn report_count(&self, comment_id: Snowflake) -> i64 {
        self.reports
            .lock()
            .iter()
            .filter(|r| r.comment_id == comment_id)
            .count() as i64
    }

    fn with_counts(&self, mut comment: Comment) -> Comment {
        comment.like_count = self.like_count(comment.id);
        comment.report_count = self.report_count(comment.id);
        comment
    }
}

// ============================================================================
// Progress
// ============================================================================

#[async_trait]
impl ProgressRepository for MemoryStore {
    async fn find(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Option<ReadingProgress>> {
        Ok(self
            .progress
            .get(&(user_id, group_id, book_id))
            .map(|p| p.clone()))
    }

    async fn upsert(&self, progress: &ReadingProgress) -> RepoResult<ReadingProgress> {
        let key = (progress.user_id, progress.group_id, progress.book_id);
        let mut stored = self.progress.entry(key).or_insert_with(|| progress.clone());
        if progress.supersedes(&stored) {
            *stored = progress.clone();
        }
        Ok(stored.clone())
    }

    async fn find_by_user(
        &self,
        user_id: Snowflake,
        group_id: Option<Snowflake>,
    ) -> RepoResult<Vec<ReadingProgress>> {
        let mut records: Vec<ReadingProgress> = self
            .progress
            .iter()
            .filter(|entry| {
                let (user, group, _) = *entry.key();
                user == user_id && group_id.map_or(true, |g| g == group)
            })
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn find_by_book(
        &self,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Vec<ReadingProgress>> {
        Ok(self
            .progress
            .iter()
            .filter(|entry| {
                let (_, group, book) = *entry.key();
                group == group_id && book == book_id
            })
            .map(|entry| entry.value().clone())
            .collect())
    }
}

// ============================================================================
// Comments
// ============================================================================

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let comment = self.comments.get(&id).map(|c| c.clone());
        Ok(comment.map(|c| self.with_counts(c)))
    }

    async fn find_by_book(
        &self,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.belongs_to(group_id, book_id))
            .map(|c| c.clone())
            .collect();
        comments.sort_by_key(Comment::thread_order_key);
        Ok(comments.into_iter().map(|c| self.with_counts(c)).collect())
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        if let Some(parent_id) = comment.parent_comment_id {
            if !self.comments.contains_key(&parent_id) {
                return Err(DomainError::ParentCommentNotFound(parent_id));
            }
        }

        let mut stored = comment.clone();
        stored.like_count = 0;
        stored.report_count = 0;

        match self.comments.entry(comment.id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(DomainError::DatabaseError(
                format!("duplicate comment id {}", comment.id),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(stored);
                Ok(())
            }
        }
    }
}

// ============================================================================
// Likes
// ============================================================================

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn apply(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        action: LikeAction,
    ) -> RepoResult<LikeState> {
        if !self.comments.contains_key(&comment_id) {
            return Err(DomainError::CommentNotFound(comment_id));
        }

        // The entry guard holds the shard lock for the whole read-modify-write
        let mut users = self.likes.entry(comment_id).or_default();
        let liked = action.apply(users.contains(&user_id));
        if liked {
            users.insert(user_id);
        } else {
            users.remove(&user_id);
        }

        Ok(LikeState::new(liked, users.len() as i64))
    }

    async fn liked_comment_ids(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashSet<Snowflake>> {
        Ok(comment_ids
            .iter()
            .copied()
            .filter(|id| {
                self.likes
                    .get(id)
                    .is_some_and(|users| users.contains(&user_id))
            })
            .collect())
    }
}

// ============================================================================
// Reports
// ============================================================================

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn create(&self, report: &SpoilerReport) -> RepoResult<SpoilerReport> {
        if !self.comments.contains_key(&report.comment_id) {
            return Err(DomainError::CommentNotFound(report.comment_id));
        }

        let mut reports = self.reports.lock();
        if let Some(existing) = reports.iter().find(|r| {
            r.comment_id == report.comment_id && r.reported_by == report.reported_by && r.is_pending()
        }) {
            return Ok(existing.clone());
        }

        reports.push(report.clone());
        Ok(report.clone())
    }
}

// ============================================================================
// Membership
// ============================================================================

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find_member(
        &self,
        group_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GroupMember>> {
        Ok(self.members.get(&(group_id, user_id)).map(|m| m.clone()))
    }

    async fn find_members(&self, group_id: Snowflake) -> RepoResult<Vec<GroupMember>> {
        let mut members: Vec<GroupMember> = self
            .members
            .iter()
            .filter(|m| m.group_id == group_id)
            .map(|m| m.clone())
            .collect();
        members.sort_by_key(|m| (m.joined_at, m.user_id));
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use readalong_core::value_objects::PageProgress;

    use super::*;

    const GROUP: Snowflake = Snowflake::new(10);
    const BOOK: Snowflake = Snowflake::new(20);

    fn progress(user: i64, page: i32) -> ReadingProgress {
        ReadingProgress::new(
            Snowflake::new(user),
            GROUP,
            BOOK,
            PageProgress::new(page, 100).unwrap(),
        )
    }

    fn comment(id: i64, author: i64, parent: Option<i64>) -> Comment {
        Comment::new(
            Snowflake::new(id),
            GROUP,
            BOOK,
            Snowflake::new(author),
            format!("comment {id}"),
            PageProgress::new(10, 100).unwrap(),
            parent.map(Snowflake::new),
        )
    }

    #[tokio::test]
    async fn test_progress_last_write_wins() {
        let store = MemoryStore::new();

        let newer = progress(1, 60);
        let mut older = progress(1, 30);
        older.updated_at = newer.updated_at - Duration::seconds(5);

        store.upsert(&newer).await.unwrap();
        let kept = store.upsert(&older).await.unwrap();
        assert_eq!(kept.current_page(), 60);

        let mut newest = progress(1, 70);
        newest.updated_at = newer.updated_at + Duration::seconds(5);
        assert_eq!(store.upsert(&newest).await.unwrap().current_page(), 70);
        assert_eq!(
            ProgressRepository::find(&store, Snowflake::new(1), GROUP, BOOK)
                .await
                .unwrap()
                .unwrap()
                .current_page(),
            70
        );
    }

    #[tokio::test]
    async fn test_progress_listings() {
        let store = MemoryStore::new();
        store.upsert(&progress(1, 10)).await.unwrap();
        store.upsert(&progress(2, 20)).await.unwrap();
        let other_group = ReadingProgress::new(
            Snowflake::new(1),
            Snowflake::new(11),
            BOOK,
            PageProgress::new(5, 50).unwrap(),
        );
        store.upsert(&other_group).await.unwrap();

        assert_eq!(store.find_by_user(Snowflake::new(1), None).await.unwrap().len(), 2);
        assert_eq!(
            store.find_by_user(Snowflake::new(1), Some(GROUP)).await.unwrap().len(),
            1
        );
        assert_eq!(ProgressRepository::find_by_book(&store, GROUP, BOOK).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_comment_parent_must_exist() {
        let store = MemoryStore::new();
        let err = CommentRepository::create(&store, &comment(2, 1, Some(1))).await.unwrap_err();
        assert!(matches!(err, DomainError::ParentCommentNotFound(_)));

        CommentRepository::create(&store, &comment(1, 1, None)).await.unwrap();
        CommentRepository::create(&store, &comment(2, 1, Some(1))).await.unwrap();
        assert!(CommentRepository::create(&store, &comment(2, 1, None)).await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let store = MemoryStore::new();
        CommentRepository::create(&store, &comment(1, 1, None)).await.unwrap();
        let (c, u) = (Snowflake::new(1), Snowflake::new(2));

        assert_eq!(store.apply(c, u, LikeAction::Toggle).await.unwrap(), LikeState::new(true, 1));
        assert_eq!(store.apply(c, u, LikeAction::Toggle).await.unwrap(), LikeState::new(false, 0));
    }

    #[tokio::test]
    async fn test_set_like_is_idempotent() {
        let store = MemoryStore::new();
        CommentRepository::create(&store, &comment(1, 1, None)).await.unwrap();
        let (c, u) = (Snowflake::new(1), Snowflake::new(2));

        store.apply(c, u, LikeAction::Set(true)).await.unwrap();
        let again = store.apply(c, u, LikeAction::Set(true)).await.unwrap();
        assert_eq!(again, LikeState::new(true, 1));
        assert_eq!(store.liked_comment_ids(u, &[c]).await.unwrap().len(), 1);

        let found = CommentRepository::find_by_id(&store, c).await.unwrap().unwrap();
        assert_eq!(found.like_count, 1);
    }

    #[tokio::test]
    async fn test_like_unknown_comment() {
        let store = MemoryStore::new();
        let err = store
            .apply(Snowflake::new(404), Snowflake::new(1), LikeAction::Toggle)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_likes_are_not_lost() {
        let store = MemoryStore::new_shared();
        CommentRepository::create(store.as_ref(), &comment(1, 1, None)).await.unwrap();

        let handles: Vec<_> = (100..150)
            .map(|user| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .apply(Snowflake::new(1), Snowflake::new(user), LikeAction::Toggle)
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let found = CommentRepository::find_by_id(store.as_ref(), Snowflake::new(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.like_count, 50);
    }

    #[tokio::test]
    async fn test_pending_report_dedupe() {
        let store = MemoryStore::new();
        CommentRepository::create(&store, &comment(1, 1, None)).await.unwrap();

        let first = SpoilerReport::new(Snowflake::new(50), Snowflake::new(1), Snowflake::new(2), "ending".into());
        let second = SpoilerReport::new(Snowflake::new(51), Snowflake::new(1), Snowflake::new(2), "again".into());

        let stored = ReportRepository::create(&store, &first).await.unwrap();
        let repeat = ReportRepository::create(&store, &second).await.unwrap();
        assert_eq!(stored.id, repeat.id);
        assert_eq!(store.reports.lock().len(), 1);

        let found = CommentRepository::find_by_id(&store, Snowflake::new(1)).await.unwrap().unwrap();
        assert_eq!(found.report_count, 1);
    }

    #[tokio::test]
    async fn test_membership() {
        let store = MemoryStore::new();
        store.add_member(GroupMember::new(GROUP, Snowflake::new(1), "Ada"));
        store.add_member(GroupMember::new(Snowflake::new(99), Snowflake::new(2), "Grace"));

        assert!(store.find_member(GROUP, Snowflake::new(1)).await.unwrap().is_some());
        assert!(store.find_member(GROUP, Snowflake::new(2)).await.unwrap().is_none());
        assert_eq!(store.find_members(GROUP).await.unwrap().len(), 1);
    }
}
