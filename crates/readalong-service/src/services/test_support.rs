//! Shared fixtures for service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use readalong_common::auth::JwtService;
use readalong_core::entities::{GroupMember, ReadingProgress};
use readalong_core::traits::{ProgressCache, RepoResult};
use readalong_core::{DomainError, Snowflake};
use readalong_db::MemoryStore;

use super::context::ServiceContext;
use super::progress::ProgressService;

pub const GROUP: Snowflake = Snowflake::new(500);
pub const BOOK: Snowflake = Snowflake::new(600);
pub const ALICE: Snowflake = Snowflake::new(1);
pub const BOB: Snowflake = Snowflake::new(2);
pub const CAROL: Snowflake = Snowflake::new(3);
pub const OUTSIDER: Snowflake = Snowflake::new(99);

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub ctx: ServiceContext,
}

/// Context over an in-memory store with Alice, Bob and Carol in `GROUP`
pub fn fixture() -> Fixture {
    build_fixture(None)
}

/// Same as [`fixture`], with a progress cache in front of the store
pub fn fixture_with_cache(cache: Arc<dyn ProgressCache>) -> Fixture {
    build_fixture(Some(cache))
}

fn build_fixture(cache: Option<Arc<dyn ProgressCache>>) -> Fixture {
    let store = MemoryStore::new_shared();
    for (id, name) in [(ALICE, "Alice"), (BOB, "Bob"), (CAROL, "Carol")] {
        store.add_member(GroupMember::new(GROUP, id, name));
    }

    let mut builder = ServiceContext::builder()
        .store(store.clone())
        .jwt_service(Arc::new(JwtService::new("service-test-secret", 900)));
    if let Some(cache) = cache {
        builder = builder.progress_cache(cache);
    }

    Fixture {
        store,
        ctx: builder.build().unwrap(),
    }
}

type CacheKey = (Snowflake, Snowflake, Snowflake);

#[derive(Default)]
struct CacheEntry {
    record: Option<ReadingProgress>,
    updated_at: Option<DateTime<Utc>>,
}

/// In-process `ProgressCache` with the Redis cache's ordering rules. Writes can be made to
/// fail.
#[derive(Default)]
pub struct FlakyCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    failing_puts: AtomicBool,
}

impl FlakyCache {
    pub fn fail_puts(&self, failing: bool) {
        self.failing_puts.store(failing, Ordering::SeqCst);
    }
}

fn key_of(progress: &ReadingProgress) -> CacheKey {
    (progress.user_id, progress.group_id, progress.book_id)
}

#[async_trait]
impl ProgressCache for FlakyCache {
    async fn get(
        &self,
        user_id: Snowflake,
        group_id: Snowflake,
        book_id: Snowflake,
    ) -> RepoResult<Option<ReadingProgress>> {
        Ok(self
            .entries
            .lock()
            .get(&(user_id, group_id, book_id))
            .and_then(|entry| entry.record.clone()))
    }

    async fn put(&self, progress: &ReadingProgress) -> RepoResult<()> {
        if self.failing_puts.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("connection refused".to_string()));
        }
        let mut entries = self.entries.lock();
        let entry = entries.entry(key_of(progress)).or_default();
        if entry.updated_at.is_some_and(|at| at > progress.updated_at) {
            return Ok(());
        }
        entry.record = Some(progress.clone());
        entry.updated_at = Some(progress.updated_at);
        Ok(())
    }

    async fn invalidate(&self, progress: &ReadingProgress) -> RepoResult<()> {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key_of(progress)).or_default();
        entry.record = None;
        entry.updated_at = entry.updated_at.max(Some(progress.updated_at));
        Ok(())
    }
}

impl Fixture {
    pub async fn at_page(&self, user: Snowflake, page: i32) {
        ProgressService::new(&self.ctx)
            .set_progress(user, GROUP, BOOK, page, 100)
            .await
            .unwrap();
    }
}
