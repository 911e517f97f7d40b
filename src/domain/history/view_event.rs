//! View history events.

use crate::domain::catalog::Work;
use crate::domain::foundation::{Timestamp, UserId, WorkId};

/// A stored detail view. Append-only.
///
/// Title and author are copied from the work at view time so history
/// survives catalog edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    pub id: i64,
    pub user_id: UserId,
    pub work_id: WorkId,
    pub viewed_at: Timestamp,
    pub title: String,
    pub author: String,
}

/// A view about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewViewEvent {
    pub user_id: UserId,
    pub work_id: WorkId,
    pub viewed_at: Timestamp,
    pub title: String,
    pub author: String,
}

impl NewViewEvent {
    pub fn for_work(user_id: UserId, work: &Work, viewed_at: Timestamp) -> Self {
        Self {
            user_id,
            work_id: work.id,
            viewed_at,
            title: work.title_or_empty().to_string(),
            author: work.author_or_empty().to_string(),
        }
    }

    pub fn into_event(self, id: i64) -> ViewEvent {
        ViewEvent {
            id,
            user_id: self.user_id,
            work_id: self.work_id,
            viewed_at: self.viewed_at,
            title: self.title,
            author: self.author,
        }
    }
}

/// Whether a view produced a new event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// A view of the same work by the same user fell inside the window.
    Deduplicated,
}

impl RecordOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordOutcome::Recorded => "recorded",
            RecordOutcome::Deduplicated => "deduplicated",
        }
    }
}
