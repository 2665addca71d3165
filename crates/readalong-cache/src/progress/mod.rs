//! Reading progress cache

mod progress_cache;

pub use progress_cache::{progress_key, RedisProgressCache, PROGRESS_PREFIX};
