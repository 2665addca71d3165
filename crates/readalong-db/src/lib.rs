//! # readalong-db
//!
//! Database layer implementing the repository ports of `readalong-core`.
//!
//! ## Overview
//!
//! - Connection pool management and the embedded schema
//! - Database models with SQLx `FromRow` derives
//! - Model to entity mappers
//! - PostgreSQL repository implementations
//! - An in-memory store with the same semantics, for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use readalong_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use readalong_db::repositories::PgCommentRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let comments = PgCommentRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, ping, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgCommentRepository, PgLikeRepository, PgMembershipRepository, PgProgressRepository,
    PgReportRepository,
};
