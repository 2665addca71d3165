//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use readalong_core::ReportStatus;
use serde::Serialize;

// ============================================================================
// Progress Responses
// ============================================================================

/// A reader's position in a book
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub user_id: String,
    pub group_id: String,
    pub book_id: String,
    pub current_page: i32,
    pub total_pages: i32,
    pub progress_percentage: f64,
    pub updated_at: DateTime<Utc>,
}

/// One member's position, as shown on the group's book page
#[derive(Debug, Clone, Serialize)]
pub struct MemberProgressResponse {
    pub user_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub current_page: i32,
    pub total_pages: i32,
    pub progress_percentage: f64,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// A visible comment with author details and ledger counts
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub group_id: String,
    pub book_id: String,
    pub user_id: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_avatar_url: Option<String>,
    pub content: String,
    pub progress_page: i32,
    pub progress_total_pages: i32,
    pub progress_percentage: f64,
    pub parent_comment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub liked_by_me: bool,
    pub report_count: i64,
    pub is_own: bool,
}

/// A visible comment with its visible replies
#[derive(Debug, Clone, Serialize)]
pub struct CommentThreadResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentThreadResponse>,
}

/// Metadata of a comment ahead of the viewer. Deliberately has no content field.
#[derive(Debug, Clone, Serialize)]
pub struct AheadItemResponse {
    pub comment_id: String,
    pub author_id: String,
    pub author_name: String,
    pub progress_page: i32,
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
}

/// "N comments ahead of you"
#[derive(Debug, Clone, Default, Serialize)]
pub struct AheadSummaryResponse {
    pub count: usize,
    pub items: Vec<AheadItemResponse>,
}

/// Everything a polling client needs to render a book's discussion
#[derive(Debug, Clone, Serialize)]
pub struct DiscussionResponse {
    /// `None` until the viewer sets progress for this book
    pub progress: Option<ProgressResponse>,
    pub comments: Vec<CommentThreadResponse>,
    pub ahead: AheadSummaryResponse,
    pub poll_interval_seconds: u64,
}

// ============================================================================
// Like & Report Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub comment_id: String,
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub comment_id: String,
    pub reported_by: String,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    /// `disabled` when no cache is configured
    pub redis: String,
}

impl ReadinessResponse {
    /// `redis_healthy` is `None` when the cache is not configured, which does not affect
    /// readiness.
    pub fn ready(database_healthy: bool, redis_healthy: Option<bool>) -> Self {
        let all_healthy = database_healthy && redis_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy).to_string(),
                redis: redis_healthy.map_or("disabled", health_label).to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

fn health_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}
