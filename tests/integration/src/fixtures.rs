//! Test fixtures
//!
//! A small reading group with three members, plus a config tuned for tests.

use readalong_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, DiscussionConfig, Environment, JwtConfig,
    RateLimitConfig, ServerConfig, SnowflakeConfig,
};
use readalong_core::Snowflake;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::helpers::TestServer;

/// Counter for unique group and book IDs
static COUNTER: AtomicI64 = AtomicI64::new(10_000);

/// Get a unique ID for test data
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

pub const ALICE: Snowflake = Snowflake::new(1);
pub const BOB: Snowflake = Snowflake::new(2);
pub const CAROL: Snowflake = Snowflake::new(3);
pub const OUTSIDER: Snowflake = Snowflake::new(99);

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Configuration for an in-process test server
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "readalong-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            run_migrations: false,
        },
        redis: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: 900,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 10_000,
            burst: 10_000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
        snowflake: SnowflakeConfig { worker_id: 7 },
        discussion: DiscussionConfig::default(),
    }
}

/// A reading group with Alice, Bob and Carol reading one book
pub struct ReadingGroup {
    pub group_id: Snowflake,
    pub book_id: Snowflake,
    pub alice: String,
    pub bob: String,
    pub carol: String,
    pub outsider: String,
}

impl ReadingGroup {
    /// Register the members on a running server and issue their tokens
    pub fn seed(server: &TestServer) -> Self {
        let group_id = unique_id();
        let book_id = unique_id();
        server.add_member(group_id, ALICE, "Alice");
        server.add_member(group_id, BOB, "Bob");
        server.add_member(group_id, CAROL, "Carol");

        Self {
            group_id,
            book_id,
            alice: server.token_for(ALICE),
            bob: server.token_for(BOB),
            carol: server.token_for(CAROL),
            outsider: server.token_for(OUTSIDER),
        }
    }

    pub fn comments(&self) -> String {
        crate::helpers::comments_path(self.group_id, self.book_id)
    }

    pub fn path(&self, rest: &str) -> String {
        crate::helpers::book_path(self.group_id, self.book_id, rest)
    }
}
