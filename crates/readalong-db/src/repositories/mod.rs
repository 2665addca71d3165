//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in readalong-core.

mod comment;
mod error;
mod like;
mod membership;
mod progress;
mod report;

pub use comment::PgCommentRepository;
pub use like::PgLikeRepository;
pub use membership::PgMembershipRepository;
pub use progress::PgProgressRepository;
pub use report::PgReportRepository;
