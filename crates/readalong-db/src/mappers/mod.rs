//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: rows are re-validated on the way in, since positions
//!   must satisfy `PageProgress` rules
//! - `*Insert` structs: prepare entity data for binding

mod comment;
mod member;
mod progress;
mod report;

pub use comment::CommentInsert;
pub use progress::ProgressInsert;
pub use report::ReportInsert;
