//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use readalong_core::entities::{Comment, GroupMember, LikeState, ReadingProgress, SpoilerReport};
use readalong_core::visibility::{AheadItem, AheadSummary, CommentThread};
use readalong_core::Snowflake;

use super::responses::{
    AheadItemResponse, AheadSummaryResponse, CommentResponse, CommentThreadResponse, LikeResponse,
    MemberProgressResponse, ProgressResponse, ReportResponse,
};

/// Display name used for authors who are no longer members of the group
pub const FORMER_MEMBER_NAME: &str = "Former member";

// ============================================================================
// Progress Mappers
// ============================================================================

impl From<&ReadingProgress> for ProgressResponse {
    fn from(progress: &ReadingProgress) -> Self {
        Self {
            user_id: progress.user_id.to_string(),
            group_id: progress.group_id.to_string(),
            book_id: progress.book_id.to_string(),
            current_page: progress.current_page(),
            total_pages: progress.total_pages(),
            progress_percentage: progress.progress_percentage(),
            updated_at: progress.updated_at,
        }
    }
}

impl From<ReadingProgress> for ProgressResponse {
    fn from(progress: ReadingProgress) -> Self {
        Self::from(&progress)
    }
}

/// Progress record joined with the member it belongs to
pub struct MemberProgress<'a> {
    pub progress: &'a ReadingProgress,
    pub member: Option<&'a GroupMember>,
}

impl From<MemberProgress<'_>> for MemberProgressResponse {
    fn from(value: MemberProgress<'_>) -> Self {
        let MemberProgress { progress, member } = value;
        Self {
            user_id: progress.user_id.to_string(),
            display_name: display_name(member),
            avatar_url: member.and_then(|m| m.avatar_url.clone()),
            current_page: progress.current_page(),
            total_pages: progress.total_pages(),
            progress_percentage: progress.progress_percentage(),
            updated_at: progress.updated_at,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

/// Comment with the viewer-specific details needed for its response
pub struct CommentView<'a> {
    pub comment: &'a Comment,
    pub author: Option<&'a GroupMember>,
    pub viewer_id: Snowflake,
    pub liked_by_me: bool,
}

impl From<CommentView<'_>> for CommentResponse {
    fn from(view: CommentView<'_>) -> Self {
        let c = view.comment;
        Self {
            id: c.id.to_string(),
            group_id: c.group_id.to_string(),
            book_id: c.book_id.to_string(),
            user_id: c.user_id.to_string(),
            author_name: display_name(view.author),
            author_avatar_url: view.author.and_then(|m| m.avatar_url.clone()),
            content: c.content.clone(),
            progress_page: c.progress_page(),
            progress_total_pages: c.progress.total_pages(),
            progress_percentage: c.progress_percentage(),
            parent_comment_id: c.parent_comment_id.map(|id| id.to_string()),
            created_at: c.created_at,
            like_count: c.like_count,
            liked_by_me: view.liked_by_me,
            report_count: c.report_count,
            is_own: c.is_authored_by(view.viewer_id),
        }
    }
}

/// Deepest reply level nested in responses. Replies below it are listed flat under their
/// ancestor at this level and keep `parent_comment_id`, so clients can still place them.
pub const MAX_REPLY_DEPTH: usize = 32;

struct Frame {
    node: CommentResponse,
    pending: std::vec::IntoIter<CommentThread>,
    done: Vec<CommentThreadResponse>,
}

/// Convert a reply forest into responses, keeping its order.
///
/// Walks with an explicit stack and caps nesting at [`MAX_REPLY_DEPTH`], so the result can
/// be serialized, parsed and dropped whatever the depth of the reply chain.
pub fn thread_responses<F>(threads: Vec<CommentThread>, to_response: F) -> Vec<CommentThreadResponse>
where
    F: Fn(&Comment) -> CommentResponse,
{
    let open = |thread: CommentThread| Frame {
        node: to_response(&thread.comment),
        done: Vec::with_capacity(thread.replies.len()),
        pending: thread.replies.into_iter(),
    };

    let mut out = Vec::with_capacity(threads.len());
    for root in threads {
        let mut stack = vec![open(root)];
        loop {
            let at_cap = stack.len() >= MAX_REPLY_DEPTH;
            let Some(top) = stack.last_mut() else { break };
            if at_cap {
                let rest: Vec<CommentThread> = top.pending.by_ref().collect();
                flatten_into(rest, &to_response, &mut top.done);
            } else if let Some(child) = top.pending.next() {
                stack.push(open(child));
                continue;
            }
            let Some(finished) = stack.pop() else { break };
            let built = CommentThreadResponse {
                comment: finished.node,
                replies: finished.done,
            };
            match stack.last_mut() {
                Some(parent) => parent.done.push(built),
                None => out.push(built),
            }
        }
    }
    out
}

/// Append every comment of `threads` to `out` as a leaf, in pre-order
fn flatten_into<F>(threads: Vec<CommentThread>, to_response: &F, out: &mut Vec<CommentThreadResponse>)
where
    F: Fn(&Comment) -> CommentResponse,
{
    let mut stack: Vec<CommentThread> = threads.into_iter().rev().collect();
    while let Some(thread) = stack.pop() {
        out.push(CommentThreadResponse {
            comment: to_response(&thread.comment),
            replies: Vec::new(),
        });
        stack.extend(thread.replies.into_iter().rev());
    }
}

// ============================================================================
// Ahead Summary Mappers
// ============================================================================

impl From<AheadItem> for AheadItemResponse {
    fn from(item: AheadItem) -> Self {
        Self {
            comment_id: item.comment_id.to_string(),
            author_id: item.author_id.to_string(),
            author_name: item.author_name,
            progress_page: item.progress_page,
            progress_percentage: item.progress_percentage,
            created_at: item.created_at,
        }
    }
}

impl From<AheadSummary> for AheadSummaryResponse {
    fn from(summary: AheadSummary) -> Self {
        Self {
            count: summary.count,
            items: summary.items.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Like & Report Mappers
// ============================================================================

impl LikeResponse {
    pub fn new(comment_id: Snowflake, state: LikeState) -> Self {
        Self {
            comment_id: comment_id.to_string(),
            liked: state.liked,
            like_count: state.like_count,
        }
    }
}

impl From<&SpoilerReport> for ReportResponse {
    fn from(report: &SpoilerReport) -> Self {
        Self {
            id: report.id.to_string(),
            comment_id: report.comment_id.to_string(),
            reported_by: report.reported_by.to_string(),
            reason: report.reason.clone(),
            status: report.status,
            created_at: report.created_at,
        }
    }
}

impl From<SpoilerReport> for ReportResponse {
    fn from(report: SpoilerReport) -> Self {
        Self::from(&report)
    }
}

/// Member display name, or a placeholder for authors who left the group
pub fn display_name(member: Option<&GroupMember>) -> String {
    member.map_or_else(|| FORMER_MEMBER_NAME.to_string(), |m| m.display_name.clone())
}
