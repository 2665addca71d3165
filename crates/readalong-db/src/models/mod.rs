//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod member;
mod progress;
mod report;

pub use comment::CommentModel;
pub use member::GroupMemberModel;
pub use progress::ProgressModel;
pub use report::ReportModel;
