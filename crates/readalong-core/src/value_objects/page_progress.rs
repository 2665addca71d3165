//! Page position within an edition of a book

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated `current_page / total_pages` pair.
///
/// Two positions are compared as exact fractions, so page 50 of 100 and page 100 of 200
/// are the same place in the book. The percentage is only for display and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct PageProgress {
    current_page: i32,
    total_pages: i32,
}

#[derive(Deserialize)]
struct RawPosition {
    current_page: i32,
    total_pages: i32,
}

impl TryFrom<RawPosition> for PageProgress {
    type Error = DomainError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.current_page, raw.total_pages)
    }
}

impl PageProgress {
    /// Validate and build a position.
    ///
    /// Fails when `current_page < 0`, `total_pages < 1` or `current_page > total_pages`.
    pub fn new(current_page: i32, total_pages: i32) -> Result<Self, DomainError> {
        if current_page < 0 {
            return Err(DomainError::InvalidProgress(
                "current_page must not be negative".to_string(),
            ));
        }
        if total_pages < 1 {
            return Err(DomainError::InvalidProgress(
                "total_pages must be at least 1".to_string(),
            ));
        }
        if current_page > total_pages {
            return Err(DomainError::InvalidProgress(format!(
                "current_page {current_page} exceeds total_pages {total_pages}"
            )));
        }
        Ok(Self {
            current_page,
            total_pages,
        })
    }

    #[inline]
    pub fn current_page(&self) -> i32 {
        self.current_page
    }

    #[inline]
    pub fn total_pages(&self) -> i32 {
        self.total_pages
    }

    /// `current_page / total_pages * 100`, clamped to `[0, 100]`
    pub fn percentage(&self) -> f64 {
        let pct = f64::from(self.current_page) * 100.0 / f64::from(self.total_pages);
        pct.clamp(0.0, 100.0)
    }

    /// Exact ordering of two positions by cross-multiplication
    pub fn cmp_position(&self, other: &Self) -> Ordering {
        let lhs = i64::from(self.current_page) * i64::from(other.total_pages);
        let rhs = i64::from(other.current_page) * i64::from(self.total_pages);
        lhs.cmp(&rhs)
    }

    /// True when `self` is at or before `other` in the book
    #[inline]
    pub fn is_at_or_behind(&self, other: &Self) -> bool {
        self.cmp_position(other) != Ordering::Greater
    }
}
