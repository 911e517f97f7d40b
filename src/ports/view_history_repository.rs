//! View history repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId, WorkId};
use crate::domain::history::{NewViewEvent, ViewEvent};

/// Append-only store of detail views.
#[async_trait]
pub trait ViewHistoryRepository: Send + Sync {
    /// Most recent view of `work_id` by `user_id`.
    async fn latest_for(
        &self,
        user_id: UserId,
        work_id: WorkId,
    ) -> Result<Option<ViewEvent>, DomainError>;

    async fn append(&self, event: NewViewEvent) -> Result<ViewEvent, DomainError>;

    /// Views by `user_id` at or after `since`.
    async fn count_since(&self, user_id: UserId, since: Timestamp) -> Result<u64, DomainError>;

    /// Work ids ordered by total views descending, ties by ascending id.
    async fn top_viewed(&self, limit: usize) -> Result<Vec<WorkId>, DomainError>;

    /// A user's views, newest first.
    async fn recent_for(&self, user_id: UserId, limit: usize) -> Result<Vec<ViewEvent>, DomainError>;
}
