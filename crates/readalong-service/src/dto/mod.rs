//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreateCommentRequest, ProgressQuery, ReportCommentRequest, SetProgressRequest};

pub use responses::{
    AheadItemResponse, AheadSummaryResponse, CommentResponse, CommentThreadResponse,
    DiscussionResponse, HealthChecks, HealthResponse, LikeResponse, MemberProgressResponse,
    ProgressResponse, ReadinessResponse, ReportResponse,
};

pub use mappers::{
    display_name, thread_responses, CommentView, MemberProgress, FORMER_MEMBER_NAME, MAX_REPLY_DEPTH,
};
