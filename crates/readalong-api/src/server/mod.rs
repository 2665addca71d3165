//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use readalong_cache::{RedisPool, RedisProgressCache};
use readalong_common::{AppConfig, AppError, JwtService};
use readalong_core::SnowflakeGenerator;
use readalong_db::{
    create_pool, run_migrations, PgCommentRepository, PgLikeRepository, PgMembershipRepository,
    PgProgressRepository, PgReportRepository,
};
use readalong_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = readalong_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let mut builder = ServiceContextBuilder::new()
        .progress_repo(Arc::new(PgProgressRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .like_repo(Arc::new(PgLikeRepository::new(pool.clone())))
        .report_repo(Arc::new(PgReportRepository::new(pool.clone())))
        .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .discussion(config.discussion.clone());

    let mut redis = None;
    if let Some(redis_config) = &config.redis {
        info!("Connecting to Redis...");
        let redis_pool = RedisPool::from_config(redis_config)
            .map_err(|e| AppError::Cache(e.to_string()))?;
        let cache = RedisProgressCache::new(
            redis_pool.clone(),
            config.discussion.progress_cache_ttl_seconds,
        );
        builder = builder.progress_cache(Arc::new(cache));
        redis = Some(Arc::new(redis_pool));
        info!("Redis progress cache enabled");
    } else {
        info!("REDIS_URL not set, progress cache disabled");
    }

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let mut state = AppState::new(service_context, config).with_database(pool);
    if let Some(redis) = redis {
        state = state.with_redis(redis);
    }
    Ok(state)
}

/// Run the HTTP server until `shutdown` resolves
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    // Peer addresses key the rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration, stopping on Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid bind address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr, shutdown_signal()).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
