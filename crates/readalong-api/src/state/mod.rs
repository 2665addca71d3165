//! Application state
//!
//! Holds the shared state for the Axum application: the service context, configuration,
//! and handles to the backing services probed by the readiness check.

use std::sync::Arc;

use readalong_cache::SharedRedisPool;
use readalong_common::{AppConfig, JwtService};
use readalong_db::PgPool;
use readalong_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// `None` when the context is backed by the in-memory store
    db_pool: Option<PgPool>,
    /// `None` when the progress cache is disabled
    redis_pool: Option<SharedRedisPool>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            db_pool: None,
            redis_pool: None,
        }
    }

    /// Attach the PostgreSQL pool for readiness checks
    pub fn with_database(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the Redis pool for readiness checks
    pub fn with_redis(mut self, pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(pool);
        self
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    pub fn db_pool(&self) -> Option<&PgPool> {
        self.db_pool.as_ref()
    }

    pub fn redis_pool(&self) -> Option<&SharedRedisPool> {
        self.redis_pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("database", &self.db_pool.is_some())
            .field("redis", &self.redis_pool.is_some())
            .finish()
    }
}
