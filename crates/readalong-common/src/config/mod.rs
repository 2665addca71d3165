//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DiscussionConfig,
    Environment, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig, SnowflakeConfig,
};
