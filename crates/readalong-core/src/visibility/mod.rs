//! Spoiler gating - decides which comments a reader may see
//!
//! Everything here is pure: callers load the viewer's current progress and the book's
//! comments, and get back the visible reply forest plus a content-free summary of what is
//! ahead. Nothing is cached, so a progress update is reflected on the next call.

mod gate;
mod summary;
mod thread;

pub use gate::{partition, Partition, Viewer};
pub use summary::{summarize_ahead, AheadItem, AheadSummary};
pub use thread::{build_thread, iter_comments, CommentThread};
