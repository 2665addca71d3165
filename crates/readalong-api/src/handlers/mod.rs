//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod comments;
pub mod health;
pub mod likes;
pub mod progress;
pub mod reports;
