//! Favorite repository port.

use async_trait::async_trait;

use crate::domain::favorites::FavoriteEntry;
use crate::domain::foundation::{DomainError, UserId, WorkId};

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn exists(&self, user_id: UserId, work_id: WorkId) -> Result<bool, DomainError>;

    /// Inserting an existing pair is a no-op.
    async fn insert(&self, entry: FavoriteEntry) -> Result<(), DomainError>;

    /// Returns whether a row was removed.
    async fn delete(&self, user_id: UserId, work_id: WorkId) -> Result<bool, DomainError>;

    /// A user's favorites, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, DomainError>;
}
