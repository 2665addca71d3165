//! Spoiler report entity <-> model mapper

use readalong_core::entities::SpoilerReport;
use readalong_core::error::DomainError;
use readalong_core::value_objects::Snowflake;

use crate::models::ReportModel;

impl TryFrom<ReportModel> for SpoilerReport {
    type Error = DomainError;

    fn try_from(model: ReportModel) -> Result<Self, Self::Error> {
        Ok(SpoilerReport {
            id: Snowflake::new(model.id),
            comment_id: Snowflake::new(model.comment_id),
            reported_by: Snowflake::new(model.reported_by),
            reason: model.reason,
            status: model.status.parse()?,
            created_at: model.created_at,
        })
    }
}

pub struct ReportInsert<'a> {
    pub id: i64,
    pub comment_id: i64,
    pub reported_by: i64,
    pub reason: &'a str,
    pub status: &'static str,
}

impl<'a> ReportInsert<'a> {
    pub fn new(report: &'a SpoilerReport) -> Self {
        Self {
            id: report.id.into_inner(),
            comment_id: report.comment_id.into_inner(),
            reported_by: report.reported_by.into_inner(),
            reason: &report.reason,
            status: report.status.as_str(),
        }
    }
}
