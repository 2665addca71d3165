//! # readalong-core
//!
//! Domain layer containing entities, value objects, repository ports and the spoiler
//! visibility engine. This crate has zero dependencies on infrastructure (database, web
//! framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;
pub mod visibility;

// Re-export commonly used types at crate root
pub use entities::{
    Comment, GroupMember, LikeAction, LikeState, ReadingProgress, ReportStatus, SpoilerReport,
    MAX_COMMENT_LENGTH, MAX_REPORT_REASON_LENGTH,
};
pub use error::DomainError;
pub use traits::{
    CommentRepository, LikeRepository, MembershipRepository, ProgressCache, ProgressRepository,
    RepoResult, ReportRepository,
};
pub use value_objects::{PageProgress, Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use visibility::{
    build_thread, partition, summarize_ahead, AheadItem, AheadSummary, CommentThread, Viewer,
};
