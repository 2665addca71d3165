//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Parent comment not found: {0}")]
    ParentCommentNotFound(Snowflake),

    #[error("Reading progress not found")]
    ProgressNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Comment content must not be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid reading progress: {0}")]
    InvalidProgress(String),

    #[error("Report reason must not be empty")]
    EmptyReportReason,

    #[error("Report reason too long: max {max} characters")]
    ReportReasonTooLong { max: usize },

    // =========================================================================
    // Precondition Errors
    // =========================================================================
    #[error("Reading progress must be set for this book before commenting")]
    ProgressRequired,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a member of group {0}")]
    NotGroupMember(Snowflake),

    #[error("Reading progress is behind this comment")]
    CommentAhead,

    #[error("Cannot report your own comment")]
    CannotReportOwnComment,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ParentCommentNotFound(_) => "UNKNOWN_PARENT_COMMENT",
            Self::ProgressNotFound => "UNKNOWN_PROGRESS",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidProgress(_) => "INVALID_PROGRESS",
            Self::EmptyReportReason => "EMPTY_REPORT_REASON",
            Self::ReportReasonTooLong { .. } => "REPORT_REASON_TOO_LONG",

            Self::ProgressRequired => "PROGRESS_REQUIRED",

            Self::NotGroupMember(_) => "NOT_GROUP_MEMBER",
            Self::CommentAhead => "COMMENT_AHEAD",
            Self::CannotReportOwnComment => "CANNOT_REPORT_OWN_COMMENT",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CommentNotFound(_) | Self::ParentCommentNotFound(_) | Self::ProgressNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::InvalidProgress(_)
                | Self::EmptyReportReason
                | Self::ReportReasonTooLong { .. }
        )
    }

    /// Check if the operation needs state the caller has not set up yet
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::ProgressRequired)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotGroupMember(_) | Self::CommentAhead | Self::CannotReportOwnComment
        )
    }
}
