//! # readalong-service
//!
//! Application layer: membership-checked discussion use cases, the service context, and
//! the request/response DTOs.

pub mod dto;
pub mod services;

pub use services::{
    CommentService, LikeService, MembershipService, ProgressService, ReportService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
