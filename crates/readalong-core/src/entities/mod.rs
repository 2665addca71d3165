//! Domain entities - core business objects

mod comment;
mod like;
mod member;
mod progress;
mod report;

pub use comment::{Comment, MAX_COMMENT_LENGTH};
pub use like::{LikeAction, LikeState};
pub use member::GroupMember;
pub use progress::ReadingProgress;
pub use report::{ReportStatus, SpoilerReport, MAX_REPORT_REASON_LENGTH};
