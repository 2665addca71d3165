//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use readalong_core::SnowflakeGenerator;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    /// `None` disables the progress cache
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub discussion: DiscussionConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply the embedded schema at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration. Tokens are issued by the identity service; this server only
/// validates them with the shared secret.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Discussion rules and client hints
#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionConfig {
    #[serde(default = "default_max_comment_length")]
    pub max_comment_length: usize,
    #[serde(default = "default_max_report_reason_length")]
    pub max_report_reason_length: usize,
    #[serde(default = "default_progress_cache_ttl")]
    pub progress_cache_ttl_seconds: u64,
    /// Suggested polling interval returned to clients
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            max_comment_length: default_max_comment_length(),
            max_report_reason_length: default_max_report_reason_length(),
            progress_cache_ttl_seconds: default_progress_cache_ttl(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "readalong".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_max_comment_length() -> usize {
    1000
}

fn default_max_report_reason_length() -> usize {
    500
}

fn default_progress_cache_ttl() -> u64 {
    300
}

fn default_poll_interval() -> u64 {
    30
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T: FromStr>(name: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default()),
    }
}

/// Parse a snowflake worker id, which must fit in 10 bits
fn parse_worker_id(name: &'static str) -> Result<u16, ConfigError> {
    let worker_id = parse_or(name, || 0)?;
    if worker_id > SnowflakeGenerator::MAX_WORKER_ID {
        return Err(ConfigError::InvalidValue(
            name,
            format!("{worker_id} (must be at most {})", SnowflakeGenerator::MAX_WORKER_ID),
        ));
    }
    Ok(worker_id)
}

/// Parse a required variable
fn parse_required<T: FromStr>(name: &'static str) -> Result<T, ConfigError> {
    let raw = env::var(name).map_err(|_| ConfigError::MissingVar(name))?;
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name, raw))
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let env = match env::var("APP_ENV") {
            Ok(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            Err(_) => default_env(),
        };

        let redis = match env::var("REDIS_URL") {
            Ok(url) if !url.trim().is_empty() => Some(RedisConfig {
                url,
                max_connections: parse_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            }),
            _ => None,
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env,
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_required("API_PORT")?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                run_migrations: parse_or("DATABASE_RUN_MIGRATIONS", default_run_migrations)?,
            },
            redis,
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                access_token_expiry: parse_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_or(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                )?,
                burst: parse_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_worker_id("WORKER_ID")?,
            },
            discussion: DiscussionConfig {
                max_comment_length: parse_or("MAX_COMMENT_LENGTH", default_max_comment_length)?,
                max_report_reason_length: parse_or(
                    "MAX_REPORT_REASON_LENGTH",
                    default_max_report_reason_length,
                )?,
                progress_cache_ttl_seconds: parse_or(
                    "PROGRESS_CACHE_TTL_SECONDS",
                    default_progress_cache_ttl,
                )?,
                poll_interval_seconds: parse_or("POLL_INTERVAL_SECONDS", default_poll_interval)?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
