//! Work repository port - read-only catalog access.

use async_trait::async_trait;

use crate::domain::catalog::{SearchCriteria, Work};
use crate::domain::foundation::{DomainError, WorkId};

#[async_trait]
pub trait WorkRepository: Send + Sync {
    async fn find_by_id(&self, id: WorkId) -> Result<Option<Work>, DomainError>;

    /// Loads the works that exist among `ids`. Order is unspecified; callers
    /// restore ranking with `order_by_ids`.
    async fn find_all_by_ids(&self, ids: &[WorkId]) -> Result<Vec<Work>, DomainError>;

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Work>, DomainError>;

    /// Works whose title or author starts with `prefix`.
    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Work>, DomainError>;

    /// Author names ordered by number of works, most prolific first.
    /// `None` returns every author.
    async fn list_authors(&self, limit: Option<usize>) -> Result<Vec<String>, DomainError>;

    /// Raw comma-joined genre tag strings, one per tagged work.
    async fn list_genre_tags(&self) -> Result<Vec<String>, DomainError>;
}
