//! Business logic services
//!
//! This module contains the service layer: membership checks, progress tracking, and the
//! spoiler-gated comment, like and report operations.

pub mod comment;
pub mod context;
pub mod error;
pub mod like;
pub mod membership;
pub mod progress;
pub mod report;

#[cfg(test)]
mod test_support;

pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use like::LikeService;
pub use membership::MembershipService;
pub use progress::ProgressService;
pub use report::ReportService;
