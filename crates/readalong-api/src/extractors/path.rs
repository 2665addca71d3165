//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use readalong_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with group_id and book_id
#[derive(Debug, Deserialize)]
pub struct GroupBookPath {
    pub group_id: String,
    pub book_id: String,
}

impl GroupBookPath {
    /// Parse group_id as Snowflake
    pub fn group_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.group_id, "group_id")
    }

    /// Parse book_id as Snowflake
    pub fn book_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.book_id, "book_id")
    }

    /// Parse both IDs
    pub fn ids(&self) -> Result<(Snowflake, Snowflake), ApiError> {
        Ok((self.group_id()?, self.book_id()?))
    }
}

/// Path parameters with comment_id
#[derive(Debug, Deserialize)]
pub struct CommentIdPath {
    pub comment_id: String,
}

impl CommentIdPath {
    /// Parse comment_id as Snowflake
    pub fn comment_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.comment_id, "comment_id")
    }
}
