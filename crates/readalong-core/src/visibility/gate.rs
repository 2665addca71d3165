//! The at-or-behind visibility rule

use crate::entities::{Comment, ReadingProgress};
use crate::value_objects::{PageProgress, Snowflake};

/// The reader a visibility decision is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Snowflake,
    /// Current stored position, `None` until the reader sets progress
    pub progress: Option<PageProgress>,
}

impl Viewer {
    pub fn new(user_id: Snowflake, progress: Option<PageProgress>) -> Self {
        Self { user_id, progress }
    }

    /// Build a viewer from a stored progress record, if any
    pub fn from_record(user_id: Snowflake, record: Option<&ReadingProgress>) -> Self {
        Self::new(user_id, record.map(|r| r.position))
    }

    #[inline]
    pub fn has_progress(&self) -> bool {
        self.progress.is_some()
    }

    /// A comment is visible when it was posted at or behind the viewer's position, or
    /// when the viewer wrote it. A viewer without progress sees nothing.
    pub fn can_see(&self, comment: &Comment) -> bool {
        let Some(position) = self.progress else {
            return false;
        };
        comment.is_authored_by(self.user_id) || comment.progress.is_at_or_behind(&position)
    }
}

/// Comments split by the gate. Together they hold every input comment exactly once.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub visible: Vec<Comment>,
    pub ahead: Vec<Comment>,
}

/// Split a book's comments into what the viewer may read and what is ahead of them.
///
/// Without progress both sets are empty.
pub fn partition(viewer: &Viewer, comments: Vec<Comment>) -> Partition {
    if !viewer.has_progress() {
        return Partition::default();
    }
    let (visible, ahead) = comments.into_iter().partition(|c| viewer.can_see(c));
    Partition { visible, ahead }
}
