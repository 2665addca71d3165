//! Reply tree construction over the visible set

use std::collections::HashMap;

use crate::entities::Comment;
use crate::value_objects::Snowflake;

/// A comment with its visible replies, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<CommentThread>,
}

impl CommentThread {
    /// Number of comments in this subtree, including the root
    pub fn size(&self) -> usize {
        iter_comments(std::slice::from_ref(self)).count()
    }
}

/// Arrange visible comments into reply trees.
///
/// Siblings are ordered by `created_at` then id. A reply is nested under its parent only
/// when the parent is in `visible` and sorts before it; otherwise it is promoted to a
/// root, so no comment is ever dropped and the result is always a forest.
pub fn build_thread(mut visible: Vec<Comment>) -> Vec<CommentThread> {
    visible.sort_by_key(Comment::thread_order_key);

    let position: HashMap<Snowflake, usize> = visible
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.id, idx))
        .collect();

    let parent_of: Vec<Option<usize>> = visible
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            c.parent_comment_id
                .and_then(|parent| position.get(&parent).copied())
                .filter(|&parent_idx| parent_idx < idx)
        })
        .collect();

    // Children always sort after their parent, so walking backwards finishes every
    // subtree before its root is reached.
    let mut pending: Vec<Vec<CommentThread>> = visible.iter().map(|_| Vec::new()).collect();
    let mut roots = Vec::new();

    for (idx, comment) in visible.into_iter().enumerate().rev() {
        let mut replies = std::mem::take(&mut pending[idx]);
        replies.reverse();
        let node = CommentThread { comment, replies };
        match parent_of[idx] {
            Some(parent_idx) => pending[parent_idx].push(node),
            None => roots.push(node),
        }
    }

    roots.reverse();
    roots
}

/// Depth-first, pre-order walk over every comment in a forest
pub fn iter_comments(threads: &[CommentThread]) -> impl Iterator<Item = &Comment> {
    let mut stack: Vec<&CommentThread> = threads.iter().rev().collect();
    std::iter::from_fn(move || {
        let node = stack.pop()?;
        stack.extend(node.replies.iter().rev());
        Some(&node.comment)
    })
}
