//! Service context - dependency container for services
//!
//! Holds the repositories, the optional progress cache, and the discussion settings
//! needed by services.

use std::sync::Arc;

use readalong_common::auth::JwtService;
use readalong_common::DiscussionConfig;
use readalong_core::traits::{
    CommentRepository, LikeRepository, MembershipRepository, ProgressCache, ProgressRepository,
    ReportRepository,
};
use readalong_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services. It provides access to:
/// - Repositories for progress, comments, likes, reports and group membership
/// - The progress cache, when one is configured
/// - JWT service for token validation
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    progress_repo: Arc<dyn ProgressRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    like_repo: Arc<dyn LikeRepository>,
    report_repo: Arc<dyn ReportRepository>,
    membership_repo: Arc<dyn MembershipRepository>,

    // Cache
    progress_cache: Option<Arc<dyn ProgressCache>>,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    discussion: DiscussionConfig,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn progress_repo(&self) -> &dyn ProgressRepository {
        self.progress_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn like_repo(&self) -> &dyn LikeRepository {
        self.like_repo.as_ref()
    }

    pub fn report_repo(&self) -> &dyn ReportRepository {
        self.report_repo.as_ref()
    }

    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    // === Cache ===

    /// Get the progress cache, if caching is enabled
    pub fn progress_cache(&self) -> Option<&dyn ProgressCache> {
        self.progress_cache.as_deref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Discussion rules and client hints
    pub fn discussion(&self) -> &DiscussionConfig {
        &self.discussion
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("progress_cache", &self.progress_cache.is_some())
            .field("discussion", &self.discussion)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    progress_repo: Option<Arc<dyn ProgressRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    like_repo: Option<Arc<dyn LikeRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    progress_cache: Option<Arc<dyn ProgressCache>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    discussion: Option<DiscussionConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one store for every repository port
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: ProgressRepository
            + CommentRepository
            + LikeRepository
            + ReportRepository
            + MembershipRepository
            + 'static,
    {
        self.progress_repo(store.clone())
            .comment_repo(store.clone())
            .like_repo(store.clone())
            .report_repo(store.clone())
            .membership_repo(store)
    }

    pub fn progress_repo(mut self, repo: Arc<dyn ProgressRepository>) -> Self {
        self.progress_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn like_repo(mut self, repo: Arc<dyn LikeRepository>) -> Self {
        self.like_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn progress_cache(mut self, cache: Arc<dyn ProgressCache>) -> Self {
        self.progress_cache = Some(cache);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn discussion(mut self, discussion: DiscussionConfig) -> Self {
        self.discussion = Some(discussion);
        self
    }

    /// Build the ServiceContext
    ///
    /// The cache is optional and the discussion settings fall back to their defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::MissingDependency` if a required port is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            progress_repo: required(self.progress_repo, "progress_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            like_repo: required(self.like_repo, "like_repo")?,
            report_repo: required(self.report_repo, "report_repo")?,
            membership_repo: required(self.membership_repo, "membership_repo")?,
            progress_cache: self.progress_cache,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: self
                .snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
            discussion: self.discussion.unwrap_or_default(),
        })
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> ServiceResult<T> {
    value.ok_or(ServiceError::MissingDependency(name))
}
