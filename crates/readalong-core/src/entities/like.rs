//! Like ledger state for one (comment, user) pair

use serde::{Deserialize, Serialize};

/// Result of a like write: the caller's membership and the recomputed total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

impl LikeState {
    pub fn new(liked: bool, like_count: i64) -> Self {
        Self { liked, like_count }
    }
}

/// Requested change to a user's like membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    /// Flip the current membership
    Toggle,
    /// Make the membership equal to the given value, no-op if it already is
    Set(bool),
}

impl LikeAction {
    /// Membership after applying this action to `current`
    #[inline]
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::Toggle => !current,
            Self::Set(liked) => liked,
        }
    }
}
