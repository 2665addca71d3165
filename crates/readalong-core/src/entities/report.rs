//! Spoiler report entity - append-only flag raised against a comment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Default maximum report reason length in characters
pub const MAX_REPORT_REASON_LENGTH: usize = 500;

/// Moderation state of a report. New reports are `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(DomainError::ValidationError(format!(
                "unknown report status: {other}"
            ))),
        }
    }
}

/// Spoiler report entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoilerReport {
    pub id: Snowflake,
    pub comment_id: Snowflake,
    pub reported_by: Snowflake,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl SpoilerReport {
    /// Create a pending report
    pub fn new(id: Snowflake, comment_id: Snowflake, reported_by: Snowflake, reason: String) -> Self {
        Self {
            id,
            comment_id,
            reported_by,
            reason,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Check a reason against the reporting rules
    pub fn validate_reason(reason: &str, max_chars: usize) -> Result<(), DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::EmptyReportReason);
        }
        if reason.chars().count() > max_chars {
            return Err(DomainError::ReportReasonTooLong { max: max_chars });
        }
        Ok(())
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::Pending
    }
}
