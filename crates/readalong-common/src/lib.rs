//! # readalong-common
//!
//! Shared utilities including configuration, error handling, token validation, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, TokenType};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DiscussionConfig,
    Environment, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig, SnowflakeConfig,
};
pub use error::{domain_status, AppError, AppResult};
pub use telemetry::{init_tracing, TracingConfig, TracingError};
