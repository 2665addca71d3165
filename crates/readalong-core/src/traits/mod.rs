//! Ports implemented by the infrastructure crates

mod cache;
mod repositories;

pub use cache::ProgressCache;
pub use repositories::{
    CommentRepository, LikeRepository, MembershipRepository, ProgressRepository, RepoResult,
    ReportRepository,
};
