//! Favorite entries.

use crate::domain::catalog::Work;
use crate::domain::foundation::{Timestamp, UserId, WorkId};

/// A bookmarked work. Unique per (user, work).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub user_id: UserId,
    pub work_id: WorkId,
    pub title: String,
    pub author: String,
    pub created_at: Timestamp,
}

impl FavoriteEntry {
    pub fn for_work(user_id: UserId, work: &Work, created_at: Timestamp) -> Self {
        Self {
            user_id,
            work_id: work.id,
            title: work.title_or_empty().to_string(),
            author: work.author_or_empty().to_string(),
            created_at,
        }
    }
}
