//! "Comments ahead of you" summary

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::Comment;
use crate::value_objects::Snowflake;

use super::Viewer;

/// Metadata of one hidden comment. Carries no content and no reply linkage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AheadItem {
    pub comment_id: Snowflake,
    pub author_id: Snowflake,
    pub author_name: String,
    pub progress_page: i32,
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AheadSummary {
    pub count: usize,
    pub items: Vec<AheadItem>,
}

/// Summarize the comments hidden from `viewer`.
///
/// Anything the viewer can see is skipped, so passing a whole book is safe. Items are
/// ordered nearest first: by position, then `created_at`, then id. The comment bodies are
/// consumed here and never reach the returned value.
pub fn summarize_ahead<I, F>(viewer: &Viewer, comments: I, author_name: F) -> AheadSummary
where
    I: IntoIterator<Item = Comment>,
    F: Fn(Snowflake) -> String,
{
    if !viewer.has_progress() {
        return AheadSummary::default();
    }

    let mut hidden: Vec<Comment> = comments.into_iter().filter(|c| !viewer.can_see(c)).collect();
    hidden.sort_by(|a, b| {
        a.progress
            .cmp_position(&b.progress)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let items: Vec<AheadItem> = hidden
        .into_iter()
        .map(|c| AheadItem {
            comment_id: c.id,
            author_id: c.user_id,
            author_name: author_name(c.user_id),
            progress_page: c.progress_page(),
            progress_percentage: c.progress_percentage(),
            created_at: c.created_at,
        })
        .collect();

    AheadSummary {
        count: items.len(),
        items,
    }
}
