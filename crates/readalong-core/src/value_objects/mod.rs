//! Value objects - immutable types that represent domain concepts

mod page_progress;
mod snowflake;

pub use page_progress::PageProgress;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
